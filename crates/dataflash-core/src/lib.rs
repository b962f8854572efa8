//! dataflash-core - Driver for AT45DB-family DataFlash chips
//!
//! This crate drives page-oriented serial flash devices (Atmel/Adesto
//! AT45DB DataFlash) over a byte-synchronous transport. It translates
//! linear byte addresses into the device's (page, offset) scheme, frames
//! and executes the opcode protocol, and exposes boundary-safe
//! read/write/erase operations. It is `no_std` compatible for use in
//! embedded environments.
//!
//! # Features
//!
//! - `std` - Enable standard library support (`std::error::Error` impl)
//! - `is_sync` - Compile the async driver API as blocking/synchronous
//!
//! # Example
//!
//! ```ignore
//! use dataflash_core::{chip, flash::Flash};
//!
//! fn dump_first_page<T: dataflash_core::transport::Transport>(transport: T) {
//!     let mut flash = Flash::new(transport, chip::AT45DB011D);
//!     flash.check_device_id().unwrap();
//!     let mut buf = [0u8; 264];
//!     flash.read_page(0, 0, &mut buf).unwrap();
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod cmd;
pub mod error;
pub mod flash;
pub mod transport;

pub use error::{Error, Result};
