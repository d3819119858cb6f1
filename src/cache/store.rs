//! Cache Manager Module
//!
//! Main cache engine combining HashMap storage with a byte budget, LRU
//! eviction, TTL expiration, and version-tag invalidation.
//!
//! Every public operation is fail-open: an internal problem degrades to a
//! miss (`None`) or a `false` return, never an error the caller must handle.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::size::{default_estimator, estimate_or_default, SizeEstimator};
use crate::cache::{CacheEntry, CacheStats, LruTracker, HIGH_WATER_RATIO};

// == Set Options ==
/// Per-call options recognized by `set` and `get_or_populate`.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// TTL in milliseconds; omission means the entry never expires via TTL
    pub ttl_ms: Option<u64>,
    /// Opaque version tag; a read with a mismatched version is a forced miss
    pub version: Option<String>,
}

impl SetOptions {
    /// Options with a TTL and no version tag.
    pub fn with_ttl(ttl_ms: u64) -> Self {
        Self {
            ttl_ms: Some(ttl_ms),
            version: None,
        }
    }

    /// Options with a version tag and no TTL.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            ttl_ms: None,
            version: Some(version.into()),
        }
    }
}

// == Cache Manager ==
/// Bounded in-memory cache with TTL, versioning, and LRU eviction.
///
/// One instance per process, constructed at startup and shared explicitly
/// (behind `Arc<RwLock<..>>`) rather than through module-level state.
pub struct CacheManager {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Memory budget in approximate bytes
    max_bytes: usize,
    /// Running sum of entry sizes
    total_bytes: usize,
    /// Payload size estimator
    estimator: SizeEstimator,
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("entries", &self.entries.len())
            .field("max_bytes", &self.max_bytes)
            .field("total_bytes", &self.total_bytes)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    // == Constructor ==
    /// Creates a new CacheManager with the given byte budget and the default
    /// JSON-length size estimator.
    pub fn new(max_bytes: usize) -> Self {
        Self::with_estimator(max_bytes, default_estimator())
    }

    /// Creates a new CacheManager with a caller-supplied size estimator.
    pub fn with_estimator(max_bytes: usize, estimator: SizeEstimator) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_bytes,
            total_bytes: 0,
            estimator,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL and version tag.
    ///
    /// If the key already exists, the entry is replaced and its TTL, version,
    /// and recency are reset. Before inserting, least-recently-used entries
    /// are evicted until the new entry fits within the byte budget.
    ///
    /// Returns `false` without inserting when the entry alone exceeds the
    /// budget; the total size never exceeds the budget after a completed set.
    pub fn set(&mut self, key: String, data: Value, opts: &SetOptions) -> bool {
        let size = estimate_or_default(&self.estimator, &data);

        if size > self.max_bytes {
            warn!(
                key = %key,
                size,
                max_bytes = self.max_bytes,
                "refusing entry larger than the entire cache budget"
            );
            return false;
        }

        // Release the old entry's accounting first on overwrite
        if let Some(old) = self.entries.remove(&key) {
            self.total_bytes = self.total_bytes.saturating_sub(old.size);
            self.lru.remove(&key);
        }

        // Pre-emptive eviction: make room before the insert completes
        while self.total_bytes + size > self.max_bytes {
            match self.lru.pop_lru() {
                Some(victim) => {
                    if let Some(evicted) = self.entries.remove(&victim) {
                        self.total_bytes = self.total_bytes.saturating_sub(evicted.size);
                        self.stats.record_eviction();
                        debug!(key = %victim, size = evicted.size, "evicted LRU entry");
                    }
                }
                None => break,
            }
        }

        let entry = CacheEntry::new(data, opts.ttl_ms, opts.version.clone(), size);
        self.total_bytes += size;
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);

        self.stats.set_item_count(self.entries.len());
        self.stats.set_total_bytes(self.total_bytes);

        true
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` when the key is absent, the entry has expired, or a
    /// `version` is supplied and does not match the stored tag. Expired and
    /// version-mismatched entries are purged as a side effect of the read.
    /// On a hit, the entry's recency marker is refreshed before returning.
    pub fn get(&mut self, key: &str, version: Option<&str>) -> Option<Value> {
        let purge = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired() => true,
            Some(entry) => match version {
                Some(requested) => entry.version.as_deref() != Some(requested),
                None => false,
            },
        };

        if purge {
            self.remove_entry(key);
            self.stats.record_miss();
            return None;
        }

        let data = match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                entry.data.clone()
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        self.lru.touch(key);
        self.stats.record_hit();
        Some(data)
    }

    // == Delete ==
    /// Removes an entry by key. Idempotent: deleting an absent key is a
    /// no-op and returns `false`.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.total_bytes = 0;
        self.stats.set_item_count(0);
        self.stats.set_total_bytes(0);
    }

    // == Batch Variants ==
    /// Stores each pair in turn. Not atomic: a refused item does not roll
    /// back the others. Returns the per-item success flags in order.
    pub fn set_many(&mut self, items: Vec<(String, Value)>, opts: &SetOptions) -> Vec<bool> {
        items
            .into_iter()
            .map(|(key, data)| self.set(key, data, opts))
            .collect()
    }

    /// Retrieves each key in turn, with the usual per-key miss semantics.
    pub fn get_many(&mut self, keys: &[&str], version: Option<&str>) -> Vec<Option<Value>> {
        keys.iter().map(|key| self.get(key, version)).collect()
    }

    // == Stats ==
    /// Returns current cache statistics, including the number of entries
    /// whose TTL has lapsed but which the sweep has not removed yet.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_item_count(self.entries.len());
        stats.set_total_bytes(self.total_bytes);
        stats.expired_count = self
            .entries
            .values()
            .filter(|entry| entry.is_expired())
            .count();
        stats
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Safety net for entries that are never read again; read-time expiry
    /// checks handle the rest. Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
        }

        count
    }

    // == Pressure Check ==
    /// Early-warning eviction, distinct from the insert-time loop: when the
    /// total size exceeds the high-water mark (80% of budget), evicts exactly
    /// one least-recently-used entry. Returns whether an eviction happened.
    pub fn check_pressure(&mut self) -> bool {
        let high_water = (self.max_bytes as f64 * HIGH_WATER_RATIO) as usize;
        if self.total_bytes <= high_water {
            return false;
        }

        if let Some(victim) = self.lru.pop_lru() {
            if let Some(evicted) = self.entries.remove(&victim) {
                self.total_bytes = self.total_bytes.saturating_sub(evicted.size);
                self.stats.record_eviction();
                self.stats.set_item_count(self.entries.len());
                self.stats.set_total_bytes(self.total_bytes);
                warn!(
                    key = %victim,
                    total_bytes = self.total_bytes,
                    high_water,
                    "memory pressure: evicted least recently used entry"
                );
                return true;
            }
        }
        false
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the running sum of approximate entry sizes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Returns the configured byte budget.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    // == Internal ==
    /// Removes an entry and releases its accounting. Returns whether the
    /// entry existed.
    fn remove_entry(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.remove(key) {
            self.total_bytes = self.total_bytes.saturating_sub(entry.size);
            self.lru.remove(key);
            self.stats.set_item_count(self.entries.len());
            self.stats.set_total_bytes(self.total_bytes);
            true
        } else {
            false
        }
    }
}
