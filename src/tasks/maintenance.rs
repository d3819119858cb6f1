//! Cache Maintenance Tasks
//!
//! Background tasks that periodically sweep expired entries and relieve
//! memory pressure. Both are owned by the process: started at startup,
//! aborted explicitly on shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a background task that periodically removes expired entries.
///
/// Read-time checks already purge expired entries that are read again; this
/// sweep is the safety net for entries that never are. The task loops until
/// aborted, sleeping for the given interval between runs.
pub fn spawn_sweep_task(
    cache: Arc<RwLock<CacheManager>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}

/// Spawns a background task that periodically checks memory pressure.
///
/// Runs on a longer interval than the sweep. Each round evicts at most one
/// least-recently-used entry, and only when total size is over the
/// high-water mark; insert-time eviction remains the primary mechanism.
pub fn spawn_pressure_task(
    cache: Arc<RwLock<CacheManager>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting memory pressure task with interval of {:?}",
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let evicted = {
                let mut cache_guard = cache.write().await;
                cache_guard.check_pressure()
            };

            if evicted {
                info!("Memory pressure check evicted one entry");
            } else {
                debug!("Memory pressure check: under high-water mark");
            }
        }
    })
}

// == Maintenance Handles ==
/// Bundle of the two maintenance task handles, for explicit teardown.
#[derive(Debug)]
pub struct MaintenanceHandles {
    sweep: JoinHandle<()>,
    pressure: JoinHandle<()>,
}

impl MaintenanceHandles {
    /// Starts both maintenance tasks against the given cache.
    pub fn start(
        cache: Arc<RwLock<CacheManager>>,
        sweep_interval: Duration,
        pressure_interval: Duration,
    ) -> Self {
        Self {
            sweep: spawn_sweep_task(cache.clone(), sweep_interval),
            pressure: spawn_pressure_task(cache, pressure_interval),
        }
    }

    /// Aborts both tasks. Used during graceful shutdown.
    pub fn abort(&self) {
        self.sweep.abort();
        self.pressure.abort();
    }
}
