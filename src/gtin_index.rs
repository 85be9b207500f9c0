//! GTIN index
//!
//! Auxiliary `gtin -> id` map persisted as its own medium entry. Nothing in
//! the record store reads or updates it, so it can lag behind the records;
//! treat lookups as hints and confirm them with `find_active_by_id`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::medium::Medium;
use crate::record::Record;

/// A persisted `gtin -> id` map
pub struct GtinIndex {
    medium: Arc<dyn Medium>,
    key: String,
    entries: HashMap<String, u64>,
}

impl GtinIndex {
    /// Load the index stored under `key`, empty if absent
    pub fn load(medium: Arc<dyn Medium>, key: &str) -> Result<Self> {
        let entries = match medium.read(key)? {
            Some(blob) => bincode::deserialize(&blob)?,
            None => HashMap::new(),
        };

        Ok(Self {
            medium,
            key: key.to_string(),
            entries,
        })
    }

    /// Map `gtin` to `id`, replacing any previous mapping
    pub fn insert(&mut self, gtin: &str, id: u64) -> Result<()> {
        self.entries.insert(gtin.to_string(), id);
        self.persist()
    }

    pub fn lookup(&self, gtin: &str) -> Option<u64> {
        self.entries.get(gtin).copied()
    }

    /// Drop the mapping for `gtin`, returning the id it pointed to
    pub fn remove(&mut self, gtin: &str) -> Result<Option<u64>> {
        let removed = self.entries.remove(gtin);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Replace the contents with the gtins of the active records
    pub fn rebuild(&mut self, records: &[Record]) -> Result<()> {
        self.entries = records
            .iter()
            .filter(|r| r.active)
            .map(|r| (r.gtin.clone(), r.id))
            .collect();
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let blob = bincode::serialize(&self.entries)?;
        self.medium.write(&self.key, &blob)
    }
}
