//! Opcode + address frame construction
//!
//! Every array/buffer command is framed as one opcode byte followed by a
//! 24-bit address. The address packs the page and byte-offset fields with
//! a split that depends on the page size: `(page << 9) | offset` for
//! 264-byte pages, `(page << 10) | offset` for 528-byte pages. The split
//! comes from the geometry, so no conditional compilation is involved.

use crate::chip::Geometry;

/// One opcode+address frame, constructed fresh per transfer
///
/// Bytes are stored least-significant-first; the transport's MSB-first
/// write walks the buffer from the highest index down, so the opcode
/// leads on the wire followed by the address high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: [u8; 4],
}

impl CommandFrame {
    /// Pack `page` and `offset` under the given geometry's address layout
    pub fn new(opcode: u8, geometry: &Geometry, page: u16, offset: u16) -> Self {
        let addr = ((page as u32) << geometry.offset_bits()) | offset as u32;
        Self {
            bytes: [addr as u8, (addr >> 8) as u8, (addr >> 16) as u8, opcode],
        }
    }

    /// The frame bytes, least-significant-first
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.bytes
    }

    /// The opcode byte of this frame
    pub fn opcode(&self) -> u8 {
        self.bytes[3]
    }
}
