//! Status register and device identity decoding
//!
//! Both registers are streamed least-significant-byte-first by the device:
//! status byte 1 then status byte 2, and manufacturer then device id 1
//! then device id 2.

use bitflags::bitflags;

bitflags! {
    /// Status register byte 1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusByte1: u8 {
        /// Page size is a power of two (256/512 instead of 264/528)
        const PAGE_SIZE = 1 << 0;
        /// Sector protection enabled
        const PROTECT = 1 << 1;
        /// Density field (device capacity encoding)
        const DENSITY = 0b0011_1100;
        /// Result of the most recent compare operation
        const COMPARE = 1 << 6;
        /// Device is ready for the next command
        const READY = 1 << 7;
    }
}

bitflags! {
    /// Status register byte 2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusByte2: u8 {
        /// A sector erase has been suspended
        const ERASE_SUSPEND = 1 << 0;
        /// A buffer 1 program has been suspended
        const PROGRAM_SUSPEND_BUF1 = 1 << 1;
        /// A buffer 2 program has been suspended
        const PROGRAM_SUSPEND_BUF2 = 1 << 2;
        /// Sector lockdown is enabled
        const SECTOR_LOCKDOWN = 1 << 3;
        /// The previous erase or program operation failed
        const ERASE_PROGRAM_ERROR = 1 << 5;
        /// Device is ready for the next command
        const READY = 1 << 7;
    }
}

/// The 2-byte device status register, read once per polling iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister {
    /// First byte on the wire
    pub byte1: StatusByte1,
    /// Second byte on the wire
    pub byte2: StatusByte2,
}

impl StatusRegister {
    /// Decode from the raw bytes in wire order
    pub fn from_raw(raw: [u8; 2]) -> Self {
        Self {
            byte1: StatusByte1::from_bits_retain(raw[0]),
            byte2: StatusByte2::from_bits_retain(raw[1]),
        }
    }

    /// Ready flag observed by the busy-poll loop (byte 2)
    pub fn is_ready(&self) -> bool {
        self.byte2.contains(StatusByte2::READY)
    }

    /// Erase/program fault flag
    pub fn erase_program_error(&self) -> bool {
        self.byte2.contains(StatusByte2::ERASE_PROGRAM_ERROR)
    }

    /// The 4-bit density field of byte 1
    pub fn density(&self) -> u8 {
        (self.byte1.bits() & StatusByte1::DENSITY.bits()) >> 2
    }

    /// Whether the device is configured for power-of-two page sizes
    pub fn power_of_two_page_size(&self) -> bool {
        self.byte1.contains(StatusByte1::PAGE_SIZE)
    }
}

/// Manufacturer and device identification register (short, 3 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// JEDEC manufacturer byte (0x1F for Atmel/Adesto)
    pub manufacturer: u8,
    /// Device id 1: family code (bits 5-7) and density code (bits 0-4)
    pub device_id_1: u8,
    /// Device id 2: sub code and product variant
    pub device_id_2: u8,
}

impl DeviceIdentity {
    /// Decode from the raw bytes in wire order
    pub fn from_raw(raw: [u8; 3]) -> Self {
        Self {
            manufacturer: raw[0],
            device_id_1: raw[1],
            device_id_2: raw[2],
        }
    }

    /// The 3-bit family code of device id 1
    pub fn family_code(&self) -> u8 {
        self.device_id_1 >> 5
    }

    /// The 5-bit density code of device id 1
    pub fn density_code(&self) -> u8 {
        self.device_id_1 & 0x1F
    }
}
