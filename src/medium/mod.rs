//! Medium Module
//!
//! The persistence medium the record store is written onto.
//!
//! ## Responsibilities
//! - Store opaque blobs under named keys
//! - Single-key atomic replacement (no multi-key transactions)
//! - Report read/write failures as storage errors
//!
//! The store never interprets a medium beyond `read`/`write`; the record
//! sequence, the header and the GTIN index are three independent entries.
//!
//! ## File Medium Blob Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ CRC (4)  │ Len (4)  │         Blob                │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

mod file;
mod memory;

pub use file::{FileMedium, BLOB_HEADER_SIZE};
pub use memory::MemoryMedium;

use crate::error::Result;

/// A key-value blob store
///
/// Implementations must be `Send + Sync`; the store shares one medium between
/// readers and its single writer.
pub trait Medium: Send + Sync {
    /// Read the blob stored under `key`, `None` if the key was never written
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`
    fn write(&self, key: &str, blob: &[u8]) -> Result<()>;
}
