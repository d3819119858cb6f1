//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL, versioning,
//! and size accounting.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with payload and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub data: Value,
    /// Timestamp of last write or last successful read (Unix milliseconds).
    /// Serves as the LRU recency marker.
    pub touched_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Opaque version tag; a read with a mismatched version is a forced miss
    pub version: Option<String>,
    /// Approximate serialized byte size, used for eviction accounting
    pub size: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL and version tag.
    ///
    /// # Arguments
    /// * `data` - The payload to store
    /// * `ttl_ms` - Optional TTL in milliseconds
    /// * `version` - Optional opaque version tag
    /// * `size` - Approximate byte size as computed by the estimator
    pub fn new(data: Value, ttl_ms: Option<u64>, version: Option<String>, size: usize) -> Self {
        let now = current_timestamp_ms();
        // Saturating: a TTL near u64::MAX means "effectively never expires",
        // not a wrapped-around timestamp in the past
        let expires_at = ttl_ms.map(|ttl| now.saturating_add(ttl));

        Self {
            data,
            touched_at: now,
            expires_at,
            version,
            size,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// time is greater than or equal to the expiration time. Exactly at
    /// expiry the entry is already a miss.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Touch ==
    /// Refreshes the recency marker after a successful read.
    pub fn touch(&mut self) {
        self.touched_at = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            expires.saturating_sub(now)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
