//! Error types for slotfile
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlotError
pub type Result<T> = std::result::Result<T, SlotError>;

/// Unified error type for slotfile operations
#[derive(Debug, Error)]
pub enum SlotError {
    // -------------------------------------------------------------------------
    // Storage I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt blob: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Record not found: id {id}")]
    NotFound { id: u64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed record: {0}")]
    Malformed(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl SlotError {
    /// True for failures of the backing medium (read/write failure, corrupt or
    /// undecodable blob). Nothing was committed by the failed call, so the
    /// whole operation can be retried.
    pub fn is_storage_io(&self) -> bool {
        matches!(
            self,
            SlotError::Io(_)
                | SlotError::Storage(_)
                | SlotError::Corruption(_)
                | SlotError::Serialization(_)
        )
    }
}

impl From<bincode::Error> for SlotError {
    fn from(err: bincode::Error) -> Self {
        SlotError::Serialization(err.to_string())
    }
}

/// Rejections raised by the caller-side validation layer before a store
/// mutation is attempted. The store itself never produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("GTIN must be exactly 13 characters, got {len}")]
    InvalidGtinLength { len: usize },

    #[error("GTIN must be ASCII, got {gtin:?}")]
    NonAsciiGtin { gtin: String },

    #[error("GTIN {gtin} already belongs to record {owner_id} (\"{owner_name}\")")]
    DuplicateGtin {
        gtin: String,
        owner_id: u64,
        owner_name: String,
    },

    #[error("record needs {size} bytes, the size field holds at most {max}")]
    RecordTooLarge { size: u32, max: u32 },
}
