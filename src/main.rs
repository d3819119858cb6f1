//! sitecache - A bounded in-memory resource cache service
//!
//! Provides TTL expiration, version-tag invalidation, size-based LRU
//! eviction, and an optional persistent store, behind a small REST API.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod persist;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use persist::PersistentStore;
use tasks::MaintenanceHandles;

/// Main entry point for the sitecache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache manager with the configured byte budget
/// 4. Open the persistent store when a directory is configured
/// 5. Start the background sweep and pressure tasks
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitecache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sitecache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_bytes={}, sweep_interval={}ms, pressure_interval={}ms, port={}",
        config.max_bytes, config.sweep_interval_ms, config.pressure_interval_ms, config.server_port
    );

    let mut state = AppState::from_config(&config);
    info!("Cache manager initialized");

    // Persistence is best-effort: a store that cannot open is logged and
    // skipped, and the in-memory cache carries on alone
    if let Some(dir) = &config.persist_dir {
        match PersistentStore::open(dir).await {
            Ok(store) => {
                info!("Persistent store opened at {}", dir.display());
                state = state.with_persist(Arc::new(store));
            }
            Err(err) => {
                warn!("Persistent store unavailable ({}); continuing without it", err);
            }
        }
    }

    let maintenance = MaintenanceHandles::start(
        state.cache.clone(),
        Duration::from_millis(config.sweep_interval_ms),
        Duration::from_millis(config.pressure_interval_ms),
    );
    info!("Background maintenance tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(maintenance))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance tasks and allows graceful
/// shutdown.
async fn shutdown_signal(maintenance: MaintenanceHandles) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    maintenance.abort();
    warn!("Maintenance tasks aborted");
}
