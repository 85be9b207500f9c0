//! Validation
//!
//! Checks callers run before handing a product to the store. The store is a
//! plain storage primitive and accepts anything it is given.

use crate::error::ValidationError;
use crate::record::{compute_size, Record, GTIN_LEN, MAX_RECORD_SIZE};

/// Product fields as entered by a user, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub gtin: String,
    pub description: String,
}

impl ProductInput {
    pub fn new(name: &str, gtin: &str, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            gtin: gtin.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    /// Bytes this product would need in a fresh slot
    pub fn natural_size(&self) -> u32 {
        compute_size(&self.name, &self.description)
    }
}

/// Validate a product about to be created
pub fn validate_create(input: &ProductInput, records: &[Record]) -> Result<(), ValidationError> {
    validate(input, records, None)
}

/// Validate new contents for the record `id`
///
/// The record may keep its own gtin.
pub fn validate_update(
    id: u64,
    input: &ProductInput,
    records: &[Record],
) -> Result<(), ValidationError> {
    validate(input, records, Some(id))
}

fn validate(
    input: &ProductInput,
    records: &[Record],
    updating: Option<u64>,
) -> Result<(), ValidationError> {
    if input.name.is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if input.gtin.is_empty() {
        return Err(ValidationError::MissingField("gtin"));
    }

    let gtin_chars = input.gtin.chars().count();
    if gtin_chars != GTIN_LEN as usize {
        return Err(ValidationError::InvalidGtinLength { len: gtin_chars });
    }
    // the layout stores the gtin as 13 raw bytes
    if !input.gtin.is_ascii() {
        return Err(ValidationError::NonAsciiGtin {
            gtin: input.gtin.clone(),
        });
    }

    let duplicate = records
        .iter()
        .find(|r| r.active && r.gtin == input.gtin && Some(r.id) != updating);
    if let Some(owner) = duplicate {
        return Err(ValidationError::DuplicateGtin {
            gtin: input.gtin.clone(),
            owner_id: owner.id,
            owner_name: owner.name.clone(),
        });
    }

    let size = input.natural_size();
    if size > MAX_RECORD_SIZE {
        return Err(ValidationError::RecordTooLarge {
            size,
            max: MAX_RECORD_SIZE,
        });
    }

    Ok(())
}
