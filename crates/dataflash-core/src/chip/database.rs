//! Supported DataFlash parts
//!
//! Geometry constants for the AT45DB "D" and "E" series, straight from the
//! manufacturer/device identification section of the datasheets. All parts
//! share manufacturer id 0x1F (Atmel/Adesto); the family/density byte
//! distinguishes capacities.

use super::types::Geometry;

/// 1 Mbit, 512 pages of 264 bytes
pub const AT45DB011D: Geometry = Geometry {
    name: "AT45DB011D",
    manufacturer_id: 0x1F,
    family_density_id: 0x22,
    page_count: 512,
    bytes_per_page: 264,
};

/// 2 Mbit, 1024 pages of 264 bytes
pub const AT45DB021E: Geometry = Geometry {
    name: "AT45DB021E",
    manufacturer_id: 0x1F,
    family_density_id: 0x23,
    page_count: 1024,
    bytes_per_page: 264,
};

/// 4 Mbit, 2048 pages of 264 bytes
pub const AT45DB041E: Geometry = Geometry {
    name: "AT45DB041E",
    manufacturer_id: 0x1F,
    family_density_id: 0x24,
    page_count: 2048,
    bytes_per_page: 264,
};

/// 8 Mbit, 4096 pages of 264 bytes
pub const AT45DB081E: Geometry = Geometry {
    name: "AT45DB081E",
    manufacturer_id: 0x1F,
    family_density_id: 0x25,
    page_count: 4096,
    bytes_per_page: 264,
};

/// 16 Mbit, 4096 pages of 528 bytes
pub const AT45DB161E: Geometry = Geometry {
    name: "AT45DB161E",
    manufacturer_id: 0x1F,
    family_density_id: 0x26,
    page_count: 4096,
    bytes_per_page: 528,
};

/// 32 Mbit, 8192 pages of 528 bytes
pub const AT45DB321E: Geometry = Geometry {
    name: "AT45DB321E",
    manufacturer_id: 0x1F,
    family_density_id: 0x27,
    page_count: 8192,
    bytes_per_page: 528,
};

/// All supported parts, smallest first
pub const SUPPORTED_CHIPS: &[Geometry] = &[
    AT45DB011D,
    AT45DB021E,
    AT45DB041E,
    AT45DB081E,
    AT45DB161E,
    AT45DB321E,
];
