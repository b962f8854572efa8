//! Device geometry types and the supported-chip table
//!
//! One geometry is active per driver instance; it is selected at
//! construction time and never mutated.

mod database;
mod types;

pub use database::*;
pub use types::{Geometry, PageAddress};
