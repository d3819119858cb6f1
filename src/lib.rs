//! sitecache - A bounded in-memory resource cache service
//!
//! Provides TTL expiration, version-tag invalidation, size-based LRU
//! eviction, a get-or-populate helper, and an optional persistent store for
//! records that should survive a restart.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod tasks;

pub use api::AppState;
pub use cache::{get_or_populate, CacheManager, SetOptions};
pub use config::Config;
pub use persist::PersistentStore;
pub use tasks::MaintenanceHandles;
