//! Record Store
//!
//! CRUD over the record sequence, on top of the header and the slot allocator.
//!
//! ## Responsibilities
//! - Assign identifiers from the header counter
//! - Place new payloads in the best-fitting tombstoned slot, or append
//! - Tombstone on delete, never remove
//! - Rewrite the whole sequence after every mutation

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use tracing::{debug, info, warn};

use crate::allocator::find_best_free_slot;
use crate::config::Config;
use crate::error::{Result, SlotError};
use crate::gtin_index::GtinIndex;
use crate::header::Header;
use crate::layout::{self, Layout};
use crate::medium::{FileMedium, Medium};
use crate::record::{compute_size, Record};
use crate::validation::{validate_create, validate_update, ProductInput};

/// The record store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (create/update/delete): serialized by `write_lock`
///   - read sequence → decide → latency → write sequence, all under the lock
///   - overlapping writers on one store can no longer overwrite each other
///
/// - **Reads** (list/find/snapshot): no lock, they see the last written
///   sequence
///
/// Two stores opened over the same medium do not coordinate with each other.
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// Where records and header are persisted
    medium: Arc<dyn Medium>,

    /// Serializes mutating operations
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Open a store on a file medium rooted at `config.data_dir`
    pub fn open(config: Config) -> Result<Self> {
        let medium = FileMedium::open(&config.data_dir, config.sync_strategy)?;
        Self::with_medium(config, Arc::new(medium))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Open a store over an injected medium
    ///
    /// Initializes the header if the medium has none yet.
    pub fn with_medium(config: Config, medium: Arc<dyn Medium>) -> Result<Self> {
        let keys = [
            ("records", &config.records_key),
            ("header", &config.header_key),
            ("gtin index", &config.gtin_index_key),
        ];
        for (i, (name, key)) in keys.iter().enumerate() {
            if let Some((other, _)) = keys[i + 1..].iter().find(|(_, k)| k == key) {
                return Err(SlotError::Config(format!(
                    "{} and {} share the key {:?}",
                    name, other, key
                )));
            }
        }

        let header = Header::load(medium.as_ref(), &config.header_key)?;

        info!(
            records_key = %config.records_key,
            last_id = header.last_id,
            latency_ms = config.write_latency.as_millis() as u64,
            "record store opened"
        );

        Ok(Self {
            config,
            medium,
            write_lock: Mutex::new(()),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All active records in storage order
    pub fn list_active(&self) -> Result<Vec<Record>> {
        let records = self.read_records()?;
        Ok(records.into_iter().filter(|r| r.active).collect())
    }

    /// First active record with the given id
    pub fn find_active_by_id(&self, id: u64) -> Result<Option<Record>> {
        let records = self.read_records()?;
        Ok(records.into_iter().find(|r| r.active && r.id == id))
    }

    /// Like `find_active_by_id`, but a missing record is an error
    pub fn get(&self, id: u64) -> Result<Record> {
        self.find_active_by_id(id)?
            .ok_or(SlotError::NotFound { id })
    }

    /// The full sequence, tombstones included
    pub fn all_records(&self) -> Result<Vec<Record>> {
        self.read_records()
    }

    /// Current header
    pub fn header(&self) -> Result<Header> {
        Header::load(self.medium.as_ref(), &self.config.header_key)
    }

    /// Copy of the sequence and header for read-only consumers
    pub fn snapshot(&self) -> Result<(Vec<Record>, Header)> {
        let records = self.read_records()?;
        let header = self.header()?;
        Ok((records, header))
    }

    /// Byte layout of the current snapshot
    pub fn layout(&self) -> Result<Layout> {
        let (records, header) = self.snapshot()?;
        layout::layout(&records, &header)
    }

    /// Load the auxiliary GTIN index kept next to the records
    ///
    /// The store never reads or maintains it.
    pub fn gtin_index(&self) -> Result<GtinIndex> {
        GtinIndex::load(Arc::clone(&self.medium), &self.config.gtin_index_key)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Store a new logical record under a fresh id
    ///
    /// No validation happens here; see `create_validated`.
    pub fn create(&self, name: &str, gtin: &str, description: &str) -> Result<Record> {
        self.create_with_id(name, gtin, description, None)
    }

    /// Store a record, reusing `existing_id` instead of drawing a new one
    ///
    /// `existing_id` must be an id this store already issued whose record is
    /// no longer active, otherwise two active records would share it.
    pub fn create_with_id(
        &self,
        name: &str,
        gtin: &str,
        description: &str,
        existing_id: Option<u64>,
    ) -> Result<Record> {
        let _write_guard = self.lock_writes()?;

        let mut records = self.read_records()?;
        self.place(&mut records, name, gtin, description, existing_id)
    }

    /// Logically delete the active record with the given id
    ///
    /// The slot keeps its capacity and becomes a best-fit candidate.
    pub fn delete(&self, id: u64) -> Result<()> {
        let _write_guard = self.lock_writes()?;

        let mut records = self.read_records()?;
        let index = match Self::active_index(&records, id) {
            Some(index) => index,
            None => {
                warn!(id, "delete: no active record");
                return Err(SlotError::NotFound { id });
            }
        };

        records[index].active = false;
        self.save_records(&records)?;

        debug!(id, index, size = records[index].size, "record tombstoned");
        Ok(())
    }

    /// Replace the payload of the active record with the given id
    ///
    /// A payload that fits the current slot is written in place and keeps
    /// the slot's capacity. A larger one tombstones the slot and is placed
    /// again like a new record, keeping its id.
    pub fn update(&self, id: u64, name: &str, gtin: &str, description: &str) -> Result<Record> {
        let _write_guard = self.lock_writes()?;

        let mut records = self.read_records()?;
        self.update_locked(&mut records, id, name, gtin, description)
    }

    /// Validate against the current sequence, then `create`
    pub fn create_validated(&self, input: &ProductInput) -> Result<Record> {
        let _write_guard = self.lock_writes()?;

        let mut records = self.read_records()?;
        validate_create(input, &records)?;
        self.place(&mut records, &input.name, &input.gtin, &input.description, None)
    }

    /// Validate against the current sequence, then `update`
    pub fn update_validated(&self, id: u64, input: &ProductInput) -> Result<Record> {
        let _write_guard = self.lock_writes()?;

        let mut records = self.read_records()?;
        validate_update(id, input, &records)?;
        self.update_locked(&mut records, id, &input.name, &input.gtin, &input.description)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the medium handle
    pub fn medium(&self) -> &Arc<dyn Medium> {
        &self.medium
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| SlotError::LockPoisoned(format!("Write lock poisoned: {}", e)))
    }

    /// Index of the active record with the given id
    fn active_index(records: &[Record], id: u64) -> Option<usize> {
        records.iter().position(|r| r.active && r.id == id)
    }

    /// Called with the write lock held
    fn update_locked(
        &self,
        records: &mut Vec<Record>,
        id: u64,
        name: &str,
        gtin: &str,
        description: &str,
    ) -> Result<Record> {
        let index = match Self::active_index(records, id) {
            Some(index) => index,
            None => {
                warn!(id, "update: no active record");
                return Err(SlotError::NotFound { id });
            }
        };

        let natural_size = compute_size(name, description);
        let capacity = records[index].size;

        if natural_size <= capacity {
            let mut updated = Record::new(id, name, gtin, description);
            updated.size = capacity;
            records[index] = updated.clone();
            self.save_records(records)?;

            debug!(id, index, natural_size, capacity, "record updated in place");
            return Ok(updated);
        }

        // Grown past its slot: free the slot, then place like a new record.
        // The tombstone is only persisted together with the placement.
        records[index].active = false;
        self.pause();

        debug!(id, index, natural_size, capacity, "record outgrew its slot");
        self.place(records, name, gtin, description, Some(id))
    }

    /// Called with the write lock held
    fn place(
        &self,
        records: &mut Vec<Record>,
        name: &str,
        gtin: &str,
        description: &str,
        existing_id: Option<u64>,
    ) -> Result<Record> {
        let natural_size = compute_size(name, description);

        let id = match existing_id {
            Some(id) => id,
            None => {
                let header = Header::load(self.medium.as_ref(), &self.config.header_key)?;
                let (id, updated) = header.next_id()?;
                updated.save(self.medium.as_ref(), &self.config.header_key)?;
                id
            }
        };

        let mut record = Record::new(id, name, gtin, description);

        match find_best_free_slot(records, natural_size) {
            Some(index) => {
                record.size = records[index].size;
                records[index] = record.clone();
                self.save_records(records)?;

                debug!(id, index, natural_size, size = record.size, "record placed in reused slot");
            }
            None => {
                records.push(record.clone());
                self.save_records(records)?;

                debug!(id, index = records.len() - 1, size = record.size, "record appended");
            }
        }

        Ok(record)
    }

    fn read_records(&self) -> Result<Vec<Record>> {
        match self.medium.read(&self.config.records_key)? {
            Some(blob) => Ok(bincode::deserialize(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Write the whole sequence after the configured latency
    fn save_records(&self, records: &[Record]) -> Result<()> {
        let blob = bincode::serialize(records)?;
        self.pause();
        self.medium.write(&self.config.records_key, &blob)
    }

    /// Artificial I/O latency
    fn pause(&self) {
        if !self.config.write_latency.is_zero() {
            thread::sleep(self.config.write_latency);
        }
    }
}
