//! Page, span, erase and staged-buffer operations
//!
//! Every operation here is one or more [`Flash::execute`] calls with a
//! specific opcode. Page-scoped operations refuse to cross a page
//! boundary; the span operations present linear addressing on top of
//! them. Zero-length spans are valid everywhere and never fail the
//! boundary checks.

use crate::cmd::{opcodes, Command};
use crate::error::{Error, Result};
use crate::flash::Flash;
use crate::transport::Transport;
use maybe_async::maybe_async;

impl<T: Transport> Flash<T> {
    // =========================================================================
    // Page operations
    // =========================================================================

    /// Read `buf.len()` bytes from `page` starting at `offset`
    ///
    /// Fails with `InvalidParam` when the span crosses the page end.
    /// Does not mutate the page.
    #[maybe_async]
    pub async fn read_page(&mut self, page: u16, offset: u16, buf: &mut [u8]) -> Result<()> {
        self.geometry().check_page_span(offset, buf.len())?;
        self.execute(&mut Command::read(opcodes::READ_LOW_POWER, page, offset, buf))
            .await
    }

    /// Write `data` into `page` at `offset`, preserving the rest of the page
    ///
    /// Uses the device's read-modify-write command: the chip merges the
    /// payload into the existing page content internally, so no host-side
    /// read-back is involved. Fails with `InvalidParam` when the span
    /// crosses the page end and `EraseProgram` on a device fault.
    #[maybe_async]
    pub async fn write_page(&mut self, page: u16, offset: u16, data: &[u8]) -> Result<()> {
        self.geometry().check_page_span(offset, data.len())?;
        self.execute(&mut Command::write(
            opcodes::READ_MODIFY_WRITE_BUF1,
            page,
            offset,
            data,
        ))
        .await
    }

    /// Rewrite `page` in place
    ///
    /// A zero-length read-modify-write; the datasheet prescribes this to
    /// refresh pages in heavily-written neighborhoods.
    #[maybe_async]
    pub async fn rewrite_page(&mut self, page: u16) -> Result<()> {
        self.write_page(page, 0, &[]).await
    }

    // =========================================================================
    // Span operations
    // =========================================================================

    /// Read across page boundaries, 16-bit address space
    #[maybe_async]
    pub async fn read_raw(&mut self, address: u16, buf: &mut [u8]) -> Result<()> {
        self.read_raw_far(address as u32, buf).await
    }

    /// Read across page boundaries, full address space
    ///
    /// The read opcode auto-advances across page boundaries on-device, so
    /// the whole span is one framed transfer regardless of length.
    #[maybe_async]
    pub async fn read_raw_far(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        let start = self.geometry().to_page_address(address, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }
        self.execute(&mut Command::read(
            opcodes::READ_LOW_POWER,
            start.page,
            start.offset,
            buf,
        ))
        .await
    }

    /// Write across page boundaries, 16-bit address space
    #[maybe_async]
    pub async fn write_raw(&mut self, address: u16, data: &[u8]) -> Result<()> {
        self.write_raw_far(address as u32, data).await
    }

    /// Write across page boundaries, full address space
    ///
    /// Decomposed into one [`Flash::write_page`] per touched page. Aborts
    /// on the first failing page; pages written before the failure are not
    /// rolled back.
    #[maybe_async]
    pub async fn write_raw_far(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let start = self.geometry().to_page_address(address, data.len())?;
        let bytes_per_page = self.geometry().bytes_per_page;
        log::debug!(
            "raw write of {} bytes at {:#08X} (page {} offset {})",
            data.len(),
            address,
            start.page,
            start.offset,
        );

        let mut page = start.page;
        let mut offset = start.offset;
        let mut remaining = data;
        while !remaining.is_empty() {
            let chunk_len = core::cmp::min(
                remaining.len(),
                (bytes_per_page - offset as u32) as usize,
            );
            let (chunk, rest) = remaining.split_at(chunk_len);
            self.write_page(page, offset, chunk).await?;

            // Only the first page uses the caller's offset
            offset = 0;
            page += 1;
            remaining = rest;
        }

        Ok(())
    }

    // =========================================================================
    // Erase operations
    // =========================================================================

    /// Erase `page` to all ones (0xFF)
    #[maybe_async]
    pub async fn erase_page(&mut self, page: u16) -> Result<()> {
        self.execute(&mut Command::control(opcodes::ERASE_PAGE, page))
            .await
    }

    /// Erase `count` pages starting at `start_page`
    ///
    /// The whole range is validated against the page count before any
    /// command is issued. Aborts on the first failing page.
    #[maybe_async]
    pub async fn erase_pages(&mut self, start_page: u16, count: u16) -> Result<()> {
        if start_page as u32 + count as u32 > self.geometry().page_count {
            return Err(Error::InvalidParam);
        }
        for page in start_page..start_page + count {
            self.erase_page(page).await?;
        }
        Ok(())
    }

    /// Erase every page of the device
    #[maybe_async]
    pub async fn erase_chip(&mut self) -> Result<()> {
        log::debug!("erasing all {} pages", self.geometry().page_count);
        self.erase_pages(0, self.geometry().page_count as u16).await
    }

    // =========================================================================
    // Staged writes through the device buffer
    // =========================================================================

    /// Copy `page` into the device-side staging buffer
    ///
    /// The returned token holds the staged state; stage further bytes with
    /// [`StagedWrite::stage`] and program the result back with
    /// [`StagedWrite::commit`]. No page data crosses the host link.
    #[maybe_async]
    pub async fn load_page_into_buffer(&mut self, page: u16) -> Result<StagedWrite<'_, T>> {
        self.execute(&mut Command::control(opcodes::READ_INTO_BUF2, page))
            .await?;
        Ok(StagedWrite { flash: self })
    }

    /// Stage `data` at `offset` in the device-side buffer
    ///
    /// Starts a staged write without loading existing page content; bytes
    /// of the buffer that are never staged carry whatever the buffer held
    /// before. Fails with `InvalidParam` when the span crosses the buffer
    /// (page) end.
    #[maybe_async]
    pub async fn stage_into_buffer(
        &mut self,
        offset: u16,
        data: &[u8],
    ) -> Result<StagedWrite<'_, T>> {
        let mut staged = StagedWrite { flash: self };
        staged.stage(offset, data).await?;
        Ok(staged)
    }
}

/// A write staged in the device-side buffer, waiting to be committed
///
/// The token mutably borrows the driver, so no unrelated operation can be
/// interleaved between staging and commit - the device buffer is the only
/// cross-call state in the protocol and interleaving would corrupt it.
/// Dropping the token abandons the staged bytes without touching any page.
#[derive(Debug)]
pub struct StagedWrite<'a, T> {
    flash: &'a mut Flash<T>,
}

impl<T: Transport> StagedWrite<'_, T> {
    /// Stage `data` at `offset` in the device buffer
    ///
    /// May be called repeatedly to assemble a page from chunks (the
    /// original firmware feeds 62-byte USB packets this way).
    #[maybe_async]
    pub async fn stage(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        self.flash.geometry().check_page_span(offset, data.len())?;
        // The device ignores the page field for buffer writes
        self.flash
            .execute(&mut Command::write(opcodes::WRITE_INTO_BUF2, 0, offset, data))
            .await
    }

    /// Program the full buffer content into `page`
    ///
    /// Consumes the token; the device erases the page and writes the
    /// complete buffer, polling until done.
    #[maybe_async]
    pub async fn commit(self, page: u16) -> Result<()> {
        self.flash
            .execute(&mut Command::control(opcodes::WRITE_BUF2_TO_PAGE, page))
            .await
    }
}
