//! dataflash-mock - In-memory DataFlash device model for testing
//!
//! This crate emulates an AT45DB-family chip behind the byte-transport
//! trait: page memory, the buffer-2 staging RAM, the status register with
//! configurable busy time and fault injection, and the identification
//! register. It also keeps a log of completed transactions so tests can
//! assert exactly which commands a driver operation issued.

use dataflash_core::chip::Geometry;
use dataflash_core::cmd::opcodes;
use dataflash_core::transport::Transport;

/// One completed select/deselect transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    /// Opcode byte of the transaction
    pub opcode: u8,
    /// Decoded page field (0 for register reads)
    pub page: u16,
    /// Decoded offset field (0 for register reads)
    pub offset: u16,
    /// Payload length: bytes written for write-class commands, bytes
    /// served for reads
    pub len: usize,
}

/// Emulated DataFlash chip
///
/// Erased state is all ones. Programs through the read-modify-write and
/// buffer-to-page commands replace the addressed bytes (the device erases
/// internally), unlike raw NOR page program which can only clear bits.
pub struct MockDataflash {
    geometry: Geometry,
    memory: Vec<u8>,
    buffer2: Vec<u8>,
    id: [u8; 3],
    /// Status reads reporting busy after each write-class command
    busy_polls_per_op: u32,
    busy_remaining: u32,
    error_flag: bool,
    fail_writes: u32,
    transfers: Vec<TransferRecord>,
    // In-flight transaction state
    selected: bool,
    rx: Vec<u8>,
    served: usize,
    read_cursor: Option<usize>,
}

impl MockDataflash {
    /// Create an erased chip with the identity matching `geometry`
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            memory: vec![0xFF; geometry.total_size() as usize],
            buffer2: vec![0xFF; geometry.bytes_per_page as usize],
            id: [geometry.manufacturer_id, geometry.family_density_id, 0x00],
            busy_polls_per_op: 0,
            busy_remaining: 0,
            error_flag: false,
            fail_writes: 0,
            transfers: Vec::new(),
            selected: false,
            rx: Vec::new(),
            served: 0,
            read_cursor: None,
        }
    }

    /// Create a chip with pre-filled memory content
    pub fn with_data(geometry: Geometry, initial_data: &[u8]) -> Self {
        let mut chip = Self::new(geometry);
        let len = initial_data.len().min(chip.memory.len());
        chip.memory[..len].copy_from_slice(&initial_data[..len]);
        chip
    }

    /// Override the identification register
    pub fn set_device_id(&mut self, id: [u8; 3]) {
        self.id = id;
    }

    /// Report busy for `polls` status reads after each write-class command
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls_per_op = polls;
    }

    /// Flag the next `count` write-class commands as erase/program faults
    pub fn fail_next_writes(&mut self, count: u32) {
        self.fail_writes = count;
    }

    /// The full linear memory
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Mutable access to the full linear memory
    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// One page of memory
    pub fn page(&self, page: u16) -> &[u8] {
        let bpp = self.geometry.bytes_per_page as usize;
        let start = page as usize * bpp;
        &self.memory[start..start + bpp]
    }

    /// Current content of the buffer-2 staging RAM
    pub fn buffer(&self) -> &[u8] {
        &self.buffer2
    }

    /// All completed transactions, in order
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Completed array/buffer commands (register reads filtered out)
    pub fn commands(&self) -> Vec<TransferRecord> {
        self.transfers
            .iter()
            .filter(|t| t.opcode != opcodes::READ_STATUS && t.opcode != opcodes::READ_DEVICE_ID)
            .copied()
            .collect()
    }

    /// Forget the transaction log
    pub fn clear_transfers(&mut self) {
        self.transfers.clear();
    }

    fn decoded_address(&self) -> (u16, u16) {
        if self.rx.len() < 4 {
            return (0, 0);
        }
        let addr =
            ((self.rx[1] as u32) << 16) | ((self.rx[2] as u32) << 8) | self.rx[3] as u32;
        let bits = self.geometry.offset_bits();
        (
            (addr >> bits) as u16,
            (addr & ((1 << bits) - 1)) as u16,
        )
    }

    fn serve_byte(&mut self) -> u8 {
        let opcode = *self.rx.first().expect("read before opcode");
        let byte = match opcode {
            opcodes::READ_STATUS => {
                let ready = self.busy_remaining == 0;
                match self.served {
                    // Byte 1: ready bit 7, density zeroed for simplicity
                    0 => (ready as u8) << 7,
                    // Byte 2: ready bit 7, fault bit 5
                    _ => ((ready as u8) << 7) | ((self.error_flag as u8) << 5),
                }
            }
            opcodes::READ_DEVICE_ID => self.id[self.served.min(2)],
            opcodes::READ_LOW_POWER => {
                let cursor = match self.read_cursor {
                    Some(c) => c,
                    None => {
                        let (page, offset) = self.decoded_address();
                        page as usize * self.geometry.bytes_per_page as usize + offset as usize
                    }
                };
                // Continuous read: advance linearly, wrap at the device end
                let byte = self.memory[cursor % self.memory.len()];
                self.read_cursor = Some((cursor + 1) % self.memory.len());
                byte
            }
            other => {
                log::warn!("read during non-read opcode {other:02X}");
                0xFF
            }
        };
        self.served += 1;
        byte
    }

    fn finish_transaction(&mut self) {
        let Some(&opcode) = self.rx.first() else {
            return;
        };
        let (page, offset) = self.decoded_address();
        let payload_len = self.rx.len().saturating_sub(4);
        let bpp = self.geometry.bytes_per_page as usize;

        let record_len = match opcode {
            opcodes::READ_STATUS => {
                if self.busy_remaining > 0 {
                    self.busy_remaining -= 1;
                }
                self.served
            }
            opcodes::READ_DEVICE_ID | opcodes::READ_LOW_POWER => self.served,
            opcodes::READ_MODIFY_WRITE_BUF1 => {
                self.start_write_class();
                if !self.error_flag {
                    let start = page as usize * bpp + offset as usize;
                    self.memory[start..start + payload_len]
                        .copy_from_slice(&self.rx[4..]);
                }
                payload_len
            }
            opcodes::WRITE_INTO_BUF2 => {
                self.start_write_class();
                if !self.error_flag {
                    self.buffer2[offset as usize..offset as usize + payload_len]
                        .copy_from_slice(&self.rx[4..]);
                }
                payload_len
            }
            opcodes::READ_INTO_BUF2 => {
                self.start_write_class();
                if !self.error_flag {
                    let start = page as usize * bpp;
                    self.buffer2.copy_from_slice(&self.memory[start..start + bpp]);
                }
                0
            }
            opcodes::WRITE_BUF2_TO_PAGE => {
                self.start_write_class();
                if !self.error_flag {
                    let start = page as usize * bpp;
                    self.memory[start..start + bpp].copy_from_slice(&self.buffer2);
                }
                0
            }
            opcodes::ERASE_PAGE => {
                self.start_write_class();
                if !self.error_flag {
                    let start = page as usize * bpp;
                    self.memory[start..start + bpp].fill(0xFF);
                }
                0
            }
            other => {
                log::warn!("unsupported opcode {other:02X}");
                0
            }
        };

        self.transfers.push(TransferRecord {
            opcode,
            page,
            offset,
            len: record_len,
        });
    }

    /// Arm busy reporting and consume one pending fault injection
    fn start_write_class(&mut self) {
        self.busy_remaining = self.busy_polls_per_op;
        self.error_flag = if self.fail_writes > 0 {
            self.fail_writes -= 1;
            true
        } else {
            false
        };
    }
}

impl Transport for MockDataflash {
    fn select(&mut self) {
        self.selected = true;
        self.rx.clear();
        self.served = 0;
        self.read_cursor = None;
    }

    fn deselect(&mut self) {
        if self.selected {
            self.finish_transaction();
        }
        self.selected = false;
    }

    fn write_msb(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().rev());
    }

    fn write_lsb(&mut self, bytes: &[u8]) {
        self.rx.extend_from_slice(bytes);
    }

    fn read_msb(&mut self, buf: &mut [u8]) {
        for slot in buf.iter_mut().rev() {
            *slot = self.serve_byte();
        }
    }

    fn read_lsb(&mut self, buf: &mut [u8]) {
        for slot in buf.iter_mut() {
            *slot = self.serve_byte();
        }
    }
}
