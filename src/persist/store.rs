//! Persistent Store Module
//!
//! Durable key/value records that survive a process restart, stored as one
//! JSON file per key under a configured directory. Independent of the
//! in-memory cache's eviction policy: no size accounting, no eviction,
//! capacity is delegated to the filesystem.
//!
//! Every operation after `open` is best-effort. Storage failures are
//! absorbed and surfaced only as `false`/`None`; this layer is never a
//! source of truth.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::cache::current_timestamp_ms;

// == Persist Error ==
/// Errors that can abort `PersistentStore::open`. Later operations absorb
/// their errors instead of returning them.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The store directory could not be created or accessed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

// == Persistent Entry ==
/// A single durable record. The key is stored in the envelope and verified
/// on read, since record files are named by a hash of the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentEntry {
    /// The cache key this record belongs to
    pub key: String,
    /// The stored payload
    pub data: Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl PersistentEntry {
    /// Same exclusive expiry boundary as the in-memory cache.
    fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(expires) if current_timestamp_ms() >= expires)
    }
}

// == Persistent Store ==
/// File-per-record durable store scoped to one directory.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    root: PathBuf,
}

impl PersistentStore {
    // == Open ==
    /// Opens the store, creating the directory if necessary. Idempotent:
    /// opening the same directory twice yields handles over the same
    /// records. Fails only when the filesystem denies access.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Returns the directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Set ==
    /// Writes a record, overwriting any existing one for the key. Returns
    /// `false` (with a warn log) instead of an error on internal failure.
    pub async fn set(&self, key: &str, data: Value, ttl_ms: Option<u64>) -> bool {
        let now = current_timestamp_ms();
        let entry = PersistentEntry {
            key: key.to_string(),
            data,
            timestamp: now,
            expires_at: ttl_ms.map(|ttl| now.saturating_add(ttl)),
        };

        match self.write_record(&entry).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, %err, "failed to persist record");
                false
            }
        }
    }

    // == Get ==
    /// Returns the stored payload, or `None` when the record is absent,
    /// unreadable, or expired. An expired record is deleted as a side
    /// effect of the read.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let path = self.record_path(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(key, %err, "failed to read persistent record");
                }
                return None;
            }
        };

        let entry: PersistentEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, %err, "corrupt persistent record treated as absent");
                return None;
            }
        };

        // Hash-named files: a different key in the envelope means collision
        if entry.key != key {
            debug!(key, stored = %entry.key, "record name collision treated as absent");
            return None;
        }

        if entry.is_expired() {
            if let Err(err) = fs::remove_file(&path).await {
                warn!(key, %err, "failed to remove expired record");
            }
            return None;
        }

        Some(entry.data)
    }

    // == Delete ==
    /// Removes the record for a key. Resolves whether or not it existed.
    pub async fn delete(&self, key: &str) {
        let path = self.record_path(key);
        if let Err(err) = fs::remove_file(&path).await {
            if err.kind() != ErrorKind::NotFound {
                warn!(key, %err, "failed to delete persistent record");
            }
        }
    }

    // == Clear ==
    /// Removes every record in the store directory. Resolves regardless of
    /// partial failures, which are logged and skipped.
    pub async fn clear(&self) {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(err) => {
                warn!(%err, "failed to list persistent store directory");
                return;
            }
        };

        loop {
            match dir.next_entry().await {
                Ok(Some(dirent)) => {
                    let path = dirent.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        if let Err(err) = fs::remove_file(&path).await {
                            warn!(path = %path.display(), %err, "failed to remove record");
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "failed to walk persistent store directory");
                    break;
                }
            }
        }
    }

    // == Internal ==
    async fn write_record(&self, entry: &PersistentEntry) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec(entry)?;
        fs::write(self.record_path(&entry.key), bytes).await?;
        Ok(())
    }

    /// Record file for a key: hex of a 64-bit hash of the key bytes.
    fn record_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.root.join(format!("{:016x}.json", hasher.finish()))
    }
}
