//! Driver handle and command-protocol execution
//!
//! `Flash::execute` is the single place that talks to the transport for
//! array and buffer commands: it validates the target against the
//! geometry, frames the opcode+address, drives the
//! select/send/transfer/deselect sequence, and for write-class commands
//! polls the status register until the device reports ready.

use crate::chip::Geometry;
use crate::cmd::{opcodes, Command, CommandFrame, DeviceIdentity, StatusRegister};
use crate::error::{Error, Result};
use crate::transport::Transport;
use maybe_async::maybe_async;

/// Default status-poll budget for write-class commands
///
/// The slowest operation on the supported parts (page erase) completes in
/// tens of milliseconds; several hundred thousand register reads outlast
/// that on any realistic link speed while still bounding a dead device.
pub const DEFAULT_POLL_LIMIT: u32 = 500_000;

/// Driver handle for one DataFlash device
///
/// Owns the transport for its lifetime; callers with multiple logical
/// users must serialize access externally. All operations are blocking
/// (in `is_sync` mode) and strictly half-duplex - one transfer at a time.
#[derive(Debug)]
pub struct Flash<T> {
    transport: T,
    geometry: Geometry,
    poll_limit: u32,
}

impl<T> Flash<T> {
    /// Create a driver for a device with the given geometry
    pub fn new(transport: T, geometry: Geometry) -> Self {
        Self {
            transport,
            geometry,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    /// Override the status-poll budget for write-class commands
    ///
    /// Polling is bounded so a device that never reports ready surfaces
    /// as [`Error::Timeout`] instead of hanging the caller forever.
    pub fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    /// The geometry this driver was built for
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Release the underlying transport
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> Flash<T> {
    /// Read the 2-byte status register
    #[maybe_async]
    pub async fn read_status(&mut self) -> StatusRegister {
        let mut raw = [0u8; 2];
        self.transport.select().await;
        self.transport.write_msb(&[opcodes::READ_STATUS]).await;
        self.transport.read_lsb(&mut raw).await;
        self.transport.deselect().await;
        StatusRegister::from_raw(raw)
    }

    /// Read the manufacturer and device identification register
    #[maybe_async]
    pub async fn read_device_id(&mut self) -> DeviceIdentity {
        let mut raw = [0u8; 3];
        self.transport.select().await;
        self.transport.write_msb(&[opcodes::READ_DEVICE_ID]).await;
        self.transport.read_lsb(&mut raw).await;
        self.transport.deselect().await;
        DeviceIdentity::from_raw(raw)
    }

    /// Verify that the attached device matches the configured geometry
    ///
    /// Compares the manufacturer byte and the family/density byte;
    /// a mismatch means a wrong chip or a wiring fault and no further
    /// operation of this driver is meaningful.
    #[maybe_async]
    pub async fn check_device_id(&mut self) -> Result<()> {
        let id = self.read_device_id().await;
        if id.manufacturer != self.geometry.manufacturer_id
            || id.device_id_1 != self.geometry.family_density_id
        {
            log::debug!(
                "device id mismatch: got {:02X}/{:02X}, expected {:02X}/{:02X} ({})",
                id.manufacturer,
                id.device_id_1,
                self.geometry.manufacturer_id,
                self.geometry.family_density_id,
                self.geometry.name,
            );
            return Err(Error::DeviceIdMismatch);
        }
        Ok(())
    }

    /// Poll the status register until the device reports ready
    ///
    /// Returns the final register value so the caller can inspect the
    /// fault flag, or `Timeout` once the poll budget is exhausted.
    #[maybe_async]
    pub(crate) async fn wait_ready(&mut self) -> Result<StatusRegister> {
        for _ in 0..self.poll_limit {
            let status = self.read_status().await;
            if status.is_ready() {
                return Ok(status);
            }
        }
        log::debug!("device stayed busy for {} status reads", self.poll_limit);
        Err(Error::Timeout)
    }

    /// Execute one framed transfer
    ///
    /// Last-resort guard: the target page and offset are checked against
    /// the geometry even when the calling operation already validated
    /// them, and nothing touches the transport on failure. Write-class
    /// commands are followed by the ready poll and fault-flag check.
    #[maybe_async]
    pub(crate) async fn execute(&mut self, cmd: &mut Command<'_>) -> Result<()> {
        if cmd.page as u32 >= self.geometry.page_count
            || cmd.offset as u32 >= self.geometry.bytes_per_page
        {
            return Err(Error::InvalidParam);
        }

        let frame = CommandFrame::new(cmd.opcode, &self.geometry, cmd.page, cmd.offset);
        log::trace!(
            "op {:02X} page {} offset {} write {} read {}",
            cmd.opcode,
            cmd.page,
            cmd.offset,
            cmd.write_data.len(),
            cmd.read_buf.len(),
        );

        self.transport.select().await;
        self.transport.write_msb(frame.as_bytes()).await;
        if cmd.write_class {
            self.transport.write_lsb(cmd.write_data).await;
        } else {
            self.transport.read_lsb(cmd.read_buf).await;
        }
        self.transport.deselect().await;

        if cmd.write_class {
            let status = self.wait_ready().await?;
            if status.erase_program_error() {
                log::debug!("op {:02X} on page {} flagged a fault", cmd.opcode, cmd.page);
                return Err(Error::EraseProgram);
            }
        }

        Ok(())
    }
}
