//! Record definitions
//!
//! A record is one product entry of the sequential file. Its `size` is the
//! capacity of the slot it occupies, which can exceed the bytes its current
//! payload needs when the slot was reused.

use serde::{Deserialize, Serialize};

/// Tombstone flag: 1 byte
pub const TOMBSTONE_LEN: u32 = 1;

/// Size indicator: 2 bytes
pub const SIZE_FIELD_LEN: u32 = 2;

/// Identifier: 8 bytes
pub const ID_LEN: u32 = 8;

/// GTIN: fixed 13 characters
pub const GTIN_LEN: u32 = 13;

/// Bytes every record occupies before its variable-length text fields
pub const FIXED_PREFIX_LEN: u32 = TOMBSTONE_LEN + SIZE_FIELD_LEN + ID_LEN + GTIN_LEN;

/// Largest capacity the 2-byte size indicator can describe
pub const MAX_RECORD_SIZE: u32 = u16::MAX as u32;

/// A stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the logical record, never reassigned
    pub id: u64,

    /// Product code, 13 characters
    pub gtin: String,

    pub name: String,

    pub description: String,

    /// `false` marks a logically deleted record (tombstone)
    pub active: bool,

    /// Capacity of the slot in bytes
    pub size: u32,
}

impl Record {
    /// Create an active record sized to its own payload
    pub fn new(
        id: u64,
        name: impl Into<String>,
        gtin: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let description = description.into();
        let size = compute_size(&name, &description);

        Self {
            id,
            gtin: gtin.into(),
            name,
            description,
            active: true,
            size,
        }
    }

    /// Bytes this payload would need if placed in a fresh slot
    pub fn natural_size(&self) -> u32 {
        compute_size(&self.name, &self.description)
    }

    /// Bytes of the slot not covered by the payload
    pub fn slack(&self) -> u32 {
        self.size.saturating_sub(self.natural_size())
    }

    /// Check if the record is logically deleted
    pub fn is_tombstone(&self) -> bool {
        !self.active
    }
}

/// Natural byte size of a record holding `name` and `description`
///
/// Text is measured in UTF-8 encoded bytes, so `"Café"` counts 5.
pub fn compute_size(name: &str, description: &str) -> u32 {
    let text_len = name.len() as u64 + description.len() as u64;
    let total = FIXED_PREFIX_LEN as u64 + text_len;
    u32::try_from(total).unwrap_or(u32::MAX)
}
