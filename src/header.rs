//! Header
//!
//! File-level metadata: the last identifier handed out.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SlotError};
use crate::medium::Medium;

/// Persisted header entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Last assigned identifier, 0 before the first record
    pub last_id: u64,
}

impl Header {
    /// Load the header stored under `key`
    ///
    /// A missing header is initialized to zero and written back, so the first
    /// access always leaves a persisted header behind.
    pub fn load(medium: &dyn Medium, key: &str) -> Result<Self> {
        match medium.read(key)? {
            Some(blob) => Ok(bincode::deserialize(&blob)?),
            None => {
                warn!(key, "header missing, initializing lastId = 0");
                let header = Header::default();
                header.save(medium, key)?;
                Ok(header)
            }
        }
    }

    /// Overwrite the stored header
    pub fn save(&self, medium: &dyn Medium, key: &str) -> Result<()> {
        let blob = bincode::serialize(self)?;
        medium.write(key, &blob)
    }

    /// Advance the counter, returning the new id and the updated header
    ///
    /// The updated header must be persisted before the id escapes, otherwise
    /// a later call could hand out the same id again.
    pub fn next_id(self) -> Result<(u64, Header)> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| SlotError::Storage("identifier space exhausted".to_string()))?;
        Ok((id, Header { last_id: id }))
    }
}
