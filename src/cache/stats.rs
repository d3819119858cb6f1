//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, evictions, item count,
//! total approximate bytes, and expired-but-unswept entries.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (absent, expired, or wrong version)
    pub misses: u64,
    /// Number of entries evicted to stay under the byte budget
    pub evictions: u64,
    /// Current number of entries in the cache
    pub item_count: usize,
    /// Sum of approximate entry sizes in bytes
    pub total_bytes: usize,
    /// Entries whose TTL has lapsed but which have not been swept yet
    pub expired_count: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Memory Usage ==
    /// Calculates budget utilization as a fraction (0.0 to 1.0).
    pub fn memory_usage(&self, max_bytes: usize) -> f64 {
        if max_bytes == 0 {
            0.0
        } else {
            self.total_bytes as f64 / max_bytes as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Item Count ==
    /// Updates the item count.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
    }

    // == Update Total Bytes ==
    /// Updates the total byte accounting.
    pub fn set_total_bytes(&mut self, bytes: usize) {
        self.total_bytes = bytes;
    }
}
