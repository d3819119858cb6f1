//! Cache Module
//!
//! Provides bounded in-memory caching with TTL expiration, version-tag
//! invalidation, and size-based LRU eviction.

mod entry;
mod lru;
mod populate;
mod size;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use populate::get_or_populate;
pub use size::{default_estimator, json_byte_length, SizeEstimator};
pub use stats::CacheStats;
pub use store::{CacheManager, SetOptions};

// == Public Constants ==
/// Default memory budget in approximate bytes
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024; // 5 MiB

/// Size assigned to payloads the estimator cannot measure
pub const DEFAULT_SIZE_ESTIMATE: usize = 1024;

/// Fraction of the budget at which the pressure check starts evicting
pub const HIGH_WATER_RATIO: f64 = 0.8;
