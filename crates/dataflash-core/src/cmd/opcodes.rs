//! DataFlash command opcodes
//!
//! Opcode bytes for the AT45DB command set as used by this driver. Only the
//! commands the driver issues are listed; the family defines many more
//! (buffer 1 variants, high-frequency reads, sector operations).

// ============================================================================
// Register reads
// ============================================================================

/// Read the 2-byte status register
pub const READ_STATUS: u8 = 0xD7;
/// Read the manufacturer and device identification register
pub const READ_DEVICE_ID: u8 = 0x9F;

// ============================================================================
// Array reads
// ============================================================================

/// Low-power continuous array read
///
/// Auto-advances across page boundaries on-device, so one framed transfer
/// can span multiple pages.
pub const READ_LOW_POWER: u8 = 0x01;

// ============================================================================
// Program operations
// ============================================================================

/// Read-modify-write through buffer 1: merges the payload into the
/// existing page content at the framed offset
pub const READ_MODIFY_WRITE_BUF1: u8 = 0x58;
/// Copy a main-memory page into buffer 2
pub const READ_INTO_BUF2: u8 = 0x55;
/// Write payload bytes into buffer 2 at the framed offset
pub const WRITE_INTO_BUF2: u8 = 0x87;
/// Program the full contents of buffer 2 into a main-memory page
/// (with built-in erase)
pub const WRITE_BUF2_TO_PAGE: u8 = 0x86;

// ============================================================================
// Erase operations
// ============================================================================

/// Erase one page to all ones (0xFF)
pub const ERASE_PAGE: u8 = 0x81;
