//! Error types for dataflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
///
/// The discriminants are the stable numeric codes reported to callers;
/// success is code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Error {
    /// Address, page, offset or size violates the device geometry.
    ///
    /// Detected before any transport I/O; no device state is touched.
    InvalidParam = 1,
    /// The device reported an erase/program fault in its status register
    /// after a write-class command completed.
    ///
    /// The command did execute and device state may be partially updated.
    /// Not retried by this layer.
    EraseProgram = 2,
    /// Device identity does not match the configured geometry.
    ///
    /// Indicates a wrong chip or a wiring fault; no further operation
    /// assumptions hold.
    DeviceIdMismatch = 3,
    /// The device did not report ready within the configured poll budget.
    Timeout = 4,
}

impl Error {
    /// Stable numeric error code (success is 0)
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParam => write!(f, "address or size out of device bounds"),
            Self::EraseProgram => write!(f, "device reported an erase/program error"),
            Self::DeviceIdMismatch => write!(f, "device identity mismatch"),
            Self::Timeout => write!(f, "device stayed busy past the poll budget"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
