//! Configuration for slotfile
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a slotfile store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Medium Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the file medium
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── records.blob     (record sequence)
    ///     ├── header.blob      (lastId)
    ///     └── gtin_index.blob  (optional GTIN index)
    pub data_dir: PathBuf,

    /// Sync strategy: whether the file medium fsyncs each blob
    pub sync_strategy: SyncStrategy,

    /// Entry name of the record sequence
    pub records_key: String,

    /// Entry name of the header
    pub header_key: String,

    /// Entry name of the auxiliary GTIN index
    pub gtin_index_key: String,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Artificial latency applied before every record sequence write
    pub write_latency: Duration,
}

/// File medium sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync every blob before the rename (safest, slowest)
    EveryWrite,

    /// leave flushing to the OS
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./slotfile_data"),
            sync_strategy: SyncStrategy::EveryWrite,
            records_key: "records".to_string(),
            header_key: "header".to_string(),
            gtin_index_key: "gtin_index".to_string(),
            write_latency: Duration::from_millis(300),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for the file medium)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the file medium sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the entry name of the record sequence
    pub fn records_key(mut self, key: impl Into<String>) -> Self {
        self.config.records_key = key.into();
        self
    }

    /// Set the entry name of the header
    pub fn header_key(mut self, key: impl Into<String>) -> Self {
        self.config.header_key = key.into();
        self
    }

    /// Set the entry name of the GTIN index
    pub fn gtin_index_key(mut self, key: impl Into<String>) -> Self {
        self.config.gtin_index_key = key.into();
        self
    }

    /// Set the artificial write latency
    pub fn write_latency(mut self, latency: Duration) -> Self {
        self.config.write_latency = latency;
        self
    }

    /// Set the artificial write latency (in milliseconds)
    pub fn write_latency_ms(mut self, ms: u64) -> Self {
        self.config.write_latency = Duration::from_millis(ms);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
