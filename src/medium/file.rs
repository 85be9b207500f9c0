//! File medium
//!
//! One checksummed file per key inside a directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::SyncStrategy;
use crate::error::{Result, SlotError};

use super::Medium;

/// Blob header size: CRC32 (4) + blob length (4)
pub const BLOB_HEADER_SIZE: usize = 8;

const BLOB_EXTENSION: &str = "blob";
const TEMP_EXTENSION: &str = "blob.tmp";

/// Medium backed by a directory of `{key}.blob` files
///
/// Each write goes to a temp file that is renamed over the previous blob, so a
/// reader sees either the old or the new blob for a key, never a mix.
pub struct FileMedium {
    /// Directory holding the blob files
    dir: PathBuf,

    /// Whether to fsync before the rename
    sync_strategy: SyncStrategy,

    /// Serializes writers so temp files are never shared
    write_lock: Mutex<()>,
}

impl FileMedium {
    /// Open or create a file medium in the given directory
    pub fn open(dir: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        fs::create_dir_all(dir)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            sync_strategy,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob file for a key
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, BLOB_EXTENSION))
    }

    /// Path of the temp file a write goes through before the rename
    pub fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, TEMP_EXTENSION))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_temp(&self, temp_path: &Path, frame: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(temp_path)?;
        file.write_all(frame)?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Keys become file names, so only a conservative alphabet is accepted
    fn check_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if valid {
            Ok(())
        } else {
            Err(SlotError::Storage(format!("Invalid medium key: {:?}", key)))
        }
    }

    /// Frame a blob: [crc(4)][len(4)][blob]
    fn encode_frame(blob: &[u8]) -> Result<Vec<u8>> {
        let len = u32::try_from(blob.len()).map_err(|_| {
            SlotError::Storage(format!("Blob too large: {} bytes", blob.len()))
        })?;

        let mut frame = Vec::with_capacity(BLOB_HEADER_SIZE + blob.len());
        frame.extend_from_slice(&crc32fast::hash(blob).to_be_bytes());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(blob);
        Ok(frame)
    }

    /// Verify and strip the frame written by `encode_frame`
    fn decode_frame(key: &str, mut frame: Vec<u8>) -> Result<Vec<u8>> {
        if frame.len() < BLOB_HEADER_SIZE {
            return Err(SlotError::Corruption(format!(
                "{}: truncated header ({} bytes)",
                key,
                frame.len()
            )));
        }

        let stored_crc = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let len = u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]) as usize;

        if frame.len() - BLOB_HEADER_SIZE != len {
            return Err(SlotError::Corruption(format!(
                "{}: length mismatch (header says {}, found {})",
                key,
                len,
                frame.len() - BLOB_HEADER_SIZE
            )));
        }

        let blob = frame.split_off(BLOB_HEADER_SIZE);
        let actual_crc = crc32fast::hash(&blob);
        if actual_crc != stored_crc {
            return Err(SlotError::Corruption(format!(
                "{}: checksum mismatch (stored {:08x}, computed {:08x})",
                key, stored_crc, actual_crc
            )));
        }

        Ok(blob)
    }
}

impl Medium for FileMedium {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Self::check_key(key)?;

        match fs::read(self.blob_path(key)) {
            Ok(frame) => Self::decode_frame(key, frame).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<()> {
        Self::check_key(key)?;
        let frame = Self::encode_frame(blob)?;

        let _guard = self.write_lock.lock();

        let temp_path = self.temp_path(key);
        let result = self
            .write_temp(&temp_path, &frame)
            .and_then(|_| fs::rename(&temp_path, self.blob_path(key)));

        if let Err(e) = result {
            // best effort, the write error is what the caller needs
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(())
    }
}
