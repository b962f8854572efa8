//! Command protocol types
//!
//! This module provides the opcode constants, the opcode+address frame,
//! status register / identity decoding, and the per-transfer `Command`
//! descriptor consumed by the driver.

mod frame;
pub mod opcodes;
mod status;

pub use frame::CommandFrame;
pub use status::{DeviceIdentity, StatusByte1, StatusByte2, StatusRegister};

/// A single framed transfer
///
/// Designed to avoid allocation - uses slices for data. The lifetime
/// parameter `'a` ties the command to the buffers it references.
pub struct Command<'a> {
    /// The opcode byte
    pub opcode: u8,
    /// Target page number
    pub page: u16,
    /// Byte offset inside the page (or inside the device buffer)
    pub offset: u16,
    /// Data to stream to the device after the frame
    pub write_data: &'a [u8],
    /// Buffer to stream device data into after the frame
    pub read_buf: &'a mut [u8],
    /// Write-class commands mutate device state and are followed by a
    /// status poll; read-class commands return immediately.
    pub write_class: bool,
}

impl<'a> Command<'a> {
    /// A read-class transfer: data flows from the device, no status poll
    pub fn read(opcode: u8, page: u16, offset: u16, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            page,
            offset,
            write_data: &[],
            read_buf: buf,
            write_class: false,
        }
    }

    /// A write-class transfer carrying payload data
    pub fn write(opcode: u8, page: u16, offset: u16, data: &'a [u8]) -> Self {
        Self {
            opcode,
            page,
            offset,
            write_data: data,
            read_buf: &mut [],
            write_class: true,
        }
    }

    /// A write-class transfer with no data phase (erase, buffer transfers)
    pub fn control(opcode: u8, page: u16) -> Self {
        Self {
            opcode,
            page,
            offset: 0,
            write_data: &[],
            read_buf: &mut [],
            write_class: true,
        }
    }
}
