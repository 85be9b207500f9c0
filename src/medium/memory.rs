//! In-memory medium
//!
//! HashMap-based medium with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

use super::Medium;

/// Volatile medium, used for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryMedium {
    /// Create an empty medium
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Check whether a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl Medium for MemoryMedium {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}
