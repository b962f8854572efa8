//! Driver behavior against the emulated chip
//!
//! These tests exercise the full path: operation -> validation -> frame ->
//! transport -> device model, asserting both the data outcome and the
//! exact command sequence the driver put on the wire.

use dataflash_core::chip::{AT45DB011D, AT45DB041E};
use dataflash_core::cmd::opcodes;
use dataflash_core::flash::Flash;
use dataflash_core::Error;
use dataflash_mock::MockDataflash;

const BPP: u32 = 264;

fn new_flash() -> Flash<MockDataflash> {
    Flash::new(MockDataflash::new(AT45DB011D), AT45DB011D)
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

// ============================================================================
// Boundary validation
// ============================================================================

#[test]
fn page_read_rejects_page_cross() {
    let mut flash = new_flash();
    let mut buf = [0u8; 8];
    assert_eq!(flash.read_page(3, 260, &mut buf), Err(Error::InvalidParam));
    // Nothing may have touched the transport
    assert!(flash.release().transfers().is_empty());
}

#[test]
fn page_write_rejects_page_cross() {
    let mut flash = new_flash();
    assert_eq!(flash.write_page(3, 257, &[0u8; 8]), Err(Error::InvalidParam));
    assert!(flash.release().transfers().is_empty());
}

#[test]
fn page_number_guard_fires_before_io() {
    let mut flash = new_flash();
    let mut buf = [0u8; 4];
    // 512 pages on this part
    assert_eq!(flash.read_page(512, 0, &mut buf), Err(Error::InvalidParam));
    assert_eq!(flash.erase_page(512), Err(Error::InvalidParam));
    assert!(flash.release().transfers().is_empty());
}

#[test]
fn raw_ops_reject_device_overrun() {
    let mut flash = new_flash();
    let size = flash.geometry().total_size() as u32;
    let mut buf = [0u8; 8];
    assert_eq!(flash.read_raw_far(size - 4, &mut buf), Err(Error::InvalidParam));
    assert_eq!(flash.write_raw_far(size - 4, &[0u8; 8]), Err(Error::InvalidParam));
    assert!(flash.release().transfers().is_empty());
}

// ============================================================================
// Round trips and span decomposition
// ============================================================================

#[test]
fn round_trip_across_page_boundary() {
    let mut flash = new_flash();
    let addr = (3 * BPP + 260) as u16;
    let data = pattern(10, 7);

    flash.write_raw(addr, &data).unwrap();

    let mut back = [0u8; 10];
    flash.read_raw(addr, &mut back).unwrap();
    assert_eq!(back, data.as_slice());

    let mock = flash.release();
    let commands = mock.commands();
    // Two page writes (4 bytes on page 3, 6 on page 4), then one framed read
    assert_eq!(commands.len(), 3);
    assert_eq!(
        (commands[0].opcode, commands[0].page, commands[0].offset, commands[0].len),
        (opcodes::READ_MODIFY_WRITE_BUF1, 3, 260, 4)
    );
    assert_eq!(
        (commands[1].opcode, commands[1].page, commands[1].offset, commands[1].len),
        (opcodes::READ_MODIFY_WRITE_BUF1, 4, 0, 6)
    );
    assert_eq!(
        (commands[2].opcode, commands[2].page, commands[2].offset, commands[2].len),
        (opcodes::READ_LOW_POWER, 3, 260, 10)
    );
}

#[test]
fn span_write_decomposes_per_page() {
    let mut flash = new_flash();
    let data = pattern((3 * BPP + 5) as usize, 1);
    flash.write_raw_far(7 * BPP, &data).unwrap();

    let mock = flash.release();
    let writes: Vec<_> = mock
        .commands()
        .into_iter()
        .filter(|c| c.opcode == opcodes::READ_MODIFY_WRITE_BUF1)
        .collect();
    assert_eq!(writes.len(), 4);
    assert_eq!((writes[0].page, writes[0].offset, writes[0].len), (7, 0, 264));
    assert_eq!((writes[1].page, writes[1].offset, writes[1].len), (8, 0, 264));
    assert_eq!((writes[2].page, writes[2].offset, writes[2].len), (9, 0, 264));
    assert_eq!((writes[3].page, writes[3].offset, writes[3].len), (10, 0, 5));

    let start = (7 * BPP) as usize;
    assert_eq!(&mock.memory()[start..start + data.len()], data.as_slice());
}

#[test]
fn far_addresses_past_16_bits() {
    let mut flash = Flash::new(MockDataflash::new(AT45DB041E), AT45DB041E);
    let addr = 100_000u32;
    let data = pattern(600, 3);

    flash.write_raw_far(addr, &data).unwrap();
    let mut back = vec![0u8; data.len()];
    flash.read_raw_far(addr, &mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn empty_spans_are_noops() {
    let mut flash = new_flash();
    flash.write_raw_far(1000, &[]).unwrap();
    let mut empty = [0u8; 0];
    flash.read_raw_far(1000, &mut empty).unwrap();
    assert!(flash.release().transfers().is_empty());
}

// ============================================================================
// Erase
// ============================================================================

#[test]
fn erase_page_sets_all_ones() {
    let seed = pattern((2 * BPP) as usize, 9);
    let mut flash = Flash::new(MockDataflash::with_data(AT45DB011D, &seed), AT45DB011D);

    flash.erase_page(1).unwrap();

    let mock = flash.release();
    assert!(mock.page(1).iter().all(|&b| b == 0xFF));
    // Neighboring page untouched
    assert_eq!(mock.page(0), &seed[..BPP as usize]);
}

#[test]
fn erase_pages_checks_the_range_up_front() {
    let mut flash = new_flash();
    assert_eq!(flash.erase_pages(510, 4), Err(Error::InvalidParam));
    assert!(flash.release().transfers().is_empty());

    let mut flash = new_flash();
    flash.write_page(510, 0, &[0u8; 264]).unwrap();
    flash.write_page(511, 0, &[0u8; 264]).unwrap();
    flash.erase_pages(510, 2).unwrap();
    let mock = flash.release();
    assert!(mock.page(510).iter().all(|&b| b == 0xFF));
    assert!(mock.page(511).iter().all(|&b| b == 0xFF));
}

#[test]
fn erase_chip_covers_every_page() {
    let mut flash = Flash::new(
        MockDataflash::with_data(AT45DB011D, &pattern(512 * BPP as usize, 5)),
        AT45DB011D,
    );
    flash.erase_chip().unwrap();

    let mock = flash.release();
    assert!(mock.memory().iter().all(|&b| b == 0xFF));
    let erases = mock
        .commands()
        .into_iter()
        .filter(|c| c.opcode == opcodes::ERASE_PAGE)
        .count();
    assert_eq!(erases, 512);
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn identity_match() {
    let mut flash = new_flash();
    assert_eq!(flash.check_device_id(), Ok(()));
}

#[test]
fn identity_mismatch() {
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.set_device_id([0x20, 0x22, 0x00]);
    let mut flash = Flash::new(mock, AT45DB011D);
    assert_eq!(flash.check_device_id(), Err(Error::DeviceIdMismatch));

    // Wrong density byte is a mismatch too
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.set_device_id([0x1F, 0x23, 0x00]);
    let mut flash = Flash::new(mock, AT45DB011D);
    assert_eq!(flash.check_device_id(), Err(Error::DeviceIdMismatch));
}

#[test]
fn identity_read_is_a_single_transaction() {
    let mut flash = new_flash();
    flash.check_device_id().unwrap();
    let mock = flash.release();
    assert_eq!(mock.transfers().len(), 1);
    assert_eq!(mock.transfers()[0].opcode, opcodes::READ_DEVICE_ID);
}

// ============================================================================
// Fault reporting and polling
// ============================================================================

#[test]
fn device_fault_surfaces_as_erase_program() {
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.fail_next_writes(1);
    let mut flash = Flash::new(mock, AT45DB011D);
    assert_eq!(flash.write_page(0, 0, &[1, 2, 3]), Err(Error::EraseProgram));
    // The fault is per-command: the next write succeeds
    assert_eq!(flash.write_page(0, 0, &[1, 2, 3]), Ok(()));
}

#[test]
fn span_write_aborts_on_first_failing_page() {
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.fail_next_writes(1);
    let mut flash = Flash::new(mock, AT45DB011D);

    let data = pattern(3 * BPP as usize, 2);
    assert_eq!(flash.write_raw_far(0, &data), Err(Error::EraseProgram));

    let writes = flash
        .release()
        .commands()
        .into_iter()
        .filter(|c| c.opcode == opcodes::READ_MODIFY_WRITE_BUF1)
        .count();
    assert_eq!(writes, 1);
}

#[test]
fn stuck_device_times_out() {
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.set_busy_polls(10);
    let mut flash = Flash::new(mock, AT45DB011D).with_poll_limit(5);
    assert_eq!(flash.erase_page(0), Err(Error::Timeout));
}

#[test]
fn slow_device_completes_within_budget() {
    let mut mock = MockDataflash::new(AT45DB011D);
    mock.set_busy_polls(3);
    let mut flash = Flash::new(mock, AT45DB011D);
    assert_eq!(flash.erase_page(0), Ok(()));
    // One erase command plus four status polls (three busy, one ready)
    assert_eq!(flash.release().transfers().len(), 5);
}

// ============================================================================
// Staged writes through the device buffer
// ============================================================================

#[test]
fn load_modify_commit_preserves_the_rest_of_the_page() {
    let seed = pattern(6 * BPP as usize, 11);
    let mut flash = Flash::new(MockDataflash::with_data(AT45DB011D, &seed), AT45DB011D);

    let staged = flash.load_page_into_buffer(5).unwrap();
    staged.commit(6).unwrap();

    // Plain copy first: page 6 now mirrors page 5
    let mut staged = flash.load_page_into_buffer(5).unwrap();
    staged.stage(10, &[0xDE, 0xAD, 0xBE]).unwrap();
    staged.commit(6).unwrap();

    let mock = flash.release();
    let page5 = &seed[5 * BPP as usize..6 * BPP as usize];
    assert_eq!(&mock.page(6)[..10], &page5[..10]);
    assert_eq!(&mock.page(6)[10..13], &[0xDE, 0xAD, 0xBE]);
    assert_eq!(&mock.page(6)[13..], &page5[13..]);
    // Source page untouched
    assert_eq!(mock.page(5), page5);
}

#[test]
fn chunked_staging_assembles_a_page() {
    let mut flash = new_flash();
    let chunk_a = pattern(62, 20);
    let chunk_b = pattern(62, 40);

    let mut staged = flash.stage_into_buffer(0, &chunk_a).unwrap();
    staged.stage(62, &chunk_b).unwrap();
    staged.commit(9).unwrap();

    let mock = flash.release();
    assert_eq!(&mock.page(9)[..62], chunk_a.as_slice());
    assert_eq!(&mock.page(9)[62..124], chunk_b.as_slice());
}

#[test]
fn staging_rejects_buffer_overrun() {
    let mut flash = new_flash();
    assert!(matches!(
        flash.stage_into_buffer(260, &[0u8; 8]),
        Err(Error::InvalidParam)
    ));
    assert!(flash.release().transfers().is_empty());
}

// ============================================================================
// Page refresh
// ============================================================================

#[test]
fn rewrite_page_is_a_zero_length_write() {
    let seed = pattern(BPP as usize, 17);
    let mut flash = Flash::new(MockDataflash::with_data(AT45DB011D, &seed), AT45DB011D);

    flash.rewrite_page(0).unwrap();

    let mock = flash.release();
    assert_eq!(mock.page(0), seed.as_slice());
    let commands = mock.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(
        (commands[0].opcode, commands[0].len),
        (opcodes::READ_MODIFY_WRITE_BUF1, 0)
    );
}
