//! Get-or-Populate Module
//!
//! Read-through helper: return the cached value when present and valid,
//! otherwise run the caller's producer, store its result, and return it.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheManager, SetOptions};

/// Returns the cached value for `key`, or computes, stores, and returns a
/// fresh one.
///
/// The producer's failure is the one error this layer lets through: only the
/// caller knows how to handle its own fetch failing, and nothing is cached
/// in that case. A store failure after a successful producer run still
/// returns the produced value (fail-open).
///
/// The cache lock is not held while the producer is awaited, so a sweep or
/// another caller may interleave between the miss and the store.
pub async fn get_or_populate<F, Fut>(
    cache: &Arc<RwLock<CacheManager>>,
    key: &str,
    opts: &SetOptions,
    producer: F,
) -> anyhow::Result<Value>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    {
        let mut cache = cache.write().await;
        if let Some(hit) = cache.get(key, opts.version.as_deref()) {
            return Ok(hit);
        }
    }

    let produced = producer().await?;

    let mut cache = cache.write().await;
    if !cache.set(key.to_string(), produced.clone(), opts) {
        debug!(key, "produced value was not cached");
    }

    Ok(produced)
}
