//! The flash driver
//!
//! `device` holds the driver handle and the command-protocol execution
//! path; `operations` builds the page, span, erase and staged-buffer
//! operations on top of it.

mod device;
mod operations;

pub use device::{Flash, DEFAULT_POLL_LIMIT};
pub use operations::StagedWrite;
