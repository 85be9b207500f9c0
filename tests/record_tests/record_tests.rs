//! Tests for Record sizing
//!
//! These tests verify:
//! - Natural size = fixed prefix + UTF-8 byte lengths
//! - Multi-byte characters count their encoded width
//! - New records start active with their natural size

use slotfile::record::{compute_size, Record, FIXED_PREFIX_LEN};

// =============================================================================
// compute_size Tests
// =============================================================================

#[test]
fn test_fixed_prefix_is_24_bytes() {
    assert_eq!(FIXED_PREFIX_LEN, 24);
    assert_eq!(compute_size("", ""), 24);
}

#[test]
fn test_ascii_fields() {
    assert_eq!(compute_size("Bread", "Whole grain"), 24 + 5 + 11);
}

#[test]
fn test_multibyte_name_counts_encoded_bytes() {
    // 4 characters, 5 bytes
    assert_eq!("Café".chars().count(), 4);
    assert_eq!(compute_size("Café", ""), 24 + 5);
}

#[test]
fn test_multibyte_description() {
    // "pão de açúcar": ã, ç, ú take 2 bytes each
    assert_eq!(compute_size("x", "pão de açúcar"), 24 + 1 + 16);
    // 3-byte and 4-byte sequences
    assert_eq!(compute_size("€", "🍞"), 24 + 3 + 4);
}

// =============================================================================
// Record Tests
// =============================================================================

#[test]
fn test_new_record_is_active_with_natural_size() {
    let record = Record::new(7, "Café", "7891234567890", "Extra strong");

    assert_eq!(record.id, 7);
    assert!(record.active);
    assert!(!record.is_tombstone());
    assert_eq!(record.size, 24 + 5 + 12);
    assert_eq!(record.size, record.natural_size());
    assert_eq!(record.slack(), 0);
}

#[test]
fn test_slack_of_oversized_slot() {
    let mut record = Record::new(1, "Tea", "7891234567890", "");
    record.size = 40;

    assert_eq!(record.natural_size(), 27);
    assert_eq!(record.slack(), 13);
}

#[test]
fn test_tombstone_flag() {
    let mut record = Record::new(1, "Tea", "7891234567890", "");
    record.active = false;

    assert!(record.is_tombstone());
}
