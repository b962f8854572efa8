//! Byte-transport capability trait
//!
//! The DataFlash sits behind a half-duplex byte-synchronous link (a USART
//! in SPI-master mode on the original hardware): a chip-select line plus an
//! ordered byte shift register. The driver consumes that link through this
//! trait; production implementations bind it to real I/O, tests bind it to
//! an in-memory device model.
//!
//! Uses `maybe_async` to support both sync and async modes:
//! - With `is_sync` feature: blocking/synchronous
//! - Without `is_sync` feature: async (for Embassy, tokio)
//!
//! Transfers are infallible: the link is a local shift register with no
//! failure path of its own, and a deselected device simply ignores traffic.
//! Links that can fail belong behind their own retry/fault layer.

use maybe_async::maybe_async;

/// Byte-level transport to the flash device
///
/// Order conventions follow the device protocol: command frames go out
/// MSB-first, page data payloads and register reads are LSB-first. The
/// MSB-first transfers walk the buffer from the highest index down, so a
/// multi-byte value stored least-significant-first leaves the wire
/// most-significant-first.
#[maybe_async(AFIT)]
pub trait Transport {
    /// Assert chip select. Idempotent.
    async fn select(&mut self);

    /// Deassert chip select. Idempotent; write-class commands start
    /// executing on the device at this edge.
    async fn deselect(&mut self);

    /// Transmit `bytes`, highest index first
    async fn write_msb(&mut self, bytes: &[u8]);

    /// Transmit `bytes`, lowest index first
    async fn write_lsb(&mut self, bytes: &[u8]);

    /// Receive into `buf`, filling the highest index first
    async fn read_msb(&mut self, buf: &mut [u8]);

    /// Receive into `buf`, filling the lowest index first
    async fn read_lsb(&mut self, buf: &mut [u8]);
}
