//! Tests for Header
//!
//! These tests verify:
//! - First load initializes and persists a zero header
//! - Save overwrites unconditionally
//! - next_id increments by one and refuses to wrap
//! - Corrupt header blobs surface as storage errors

use slotfile::header::Header;
use slotfile::medium::{Medium, MemoryMedium};

const KEY: &str = "header";

#[test]
fn test_load_missing_initializes_and_persists() {
    let medium = MemoryMedium::new();
    assert!(!medium.contains(KEY));

    let header = Header::load(&medium, KEY).unwrap();

    assert_eq!(header.last_id, 0);
    assert!(medium.contains(KEY));
}

#[test]
fn test_save_then_load() {
    let medium = MemoryMedium::new();

    Header { last_id: 41 }.save(&medium, KEY).unwrap();
    assert_eq!(Header::load(&medium, KEY).unwrap().last_id, 41);

    Header { last_id: 3 }.save(&medium, KEY).unwrap();
    assert_eq!(Header::load(&medium, KEY).unwrap().last_id, 3);
}

#[test]
fn test_next_id_increments() {
    let header = Header::default();

    let (first, header) = header.next_id().unwrap();
    let (second, header) = header.next_id().unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(header.last_id, 2);
}

#[test]
fn test_next_id_leaves_receiver_unchanged() {
    let header = Header { last_id: 9 };

    let (id, updated) = header.next_id().unwrap();

    assert_eq!(id, 10);
    assert_eq!(updated.last_id, 10);
    assert_eq!(header.last_id, 9);
}

#[test]
fn test_next_id_at_max_is_storage_error() {
    let header = Header { last_id: u64::MAX };

    let err = header.next_id().unwrap_err();

    assert!(err.is_storage_io());
}

#[test]
fn test_corrupt_header_is_storage_error() {
    let medium = MemoryMedium::new();
    medium.write(KEY, &[1, 2, 3]).unwrap();

    let err = Header::load(&medium, KEY).unwrap_err();

    assert!(err.is_storage_io());
}
