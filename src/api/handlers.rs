//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheManager, SetOptions};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetQuery, GetResponse, HealthResponse, PersistSetRequest,
    SetRequest, SetResponse, StatsResponse,
};
use crate::persist::PersistentStore;

/// Application state shared across all handlers.
///
/// One explicit cache instance per process, constructed at startup and
/// injected here rather than reached through module-level state.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache manager
    pub cache: Arc<RwLock<CacheManager>>,
    /// Optional persistent store; None when persistence is not configured
    pub persist: Option<Arc<PersistentStore>>,
}

impl AppState {
    /// Creates a new AppState with the given cache manager and no
    /// persistent store.
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            persist: None,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheManager::new(config.max_bytes))
    }

    /// Attaches an open persistent store.
    pub fn with_persist(mut self, persist: Arc<PersistentStore>) -> Self {
        self.persist = Some(persist);
        self
    }

    fn persist_store(&self) -> Result<&Arc<PersistentStore>> {
        self.persist
            .as_ref()
            .ok_or_else(|| CacheError::Unavailable("persistent store not configured".to_string()))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL and version tag.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let opts = SetOptions {
        ttl_ms: req.ttl_ms,
        version: req.version,
    };

    let mut cache = state.cache.write().await;
    if !cache.set(req.key.clone(), req.value, &opts) {
        // The only set failure: the entry alone exceeds the byte budget
        return Err(CacheError::TooLarge(req.key));
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key, optionally checking a version
/// tag supplied as `?version=...`. A miss, an expired entry, and a version
/// mismatch all surface as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    // Write lock: a read refreshes recency and may purge the entry
    let mut cache = state.cache.write().await;
    match cache.get(&key, query.version.as_deref()) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Idempotent: always returns 200.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let mut cache = state.cache.write().await;
    cache.delete(&key);

    Json(DeleteResponse::new(key))
}

/// Handler for POST /clear
///
/// Removes all entries from the cache.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    cache.clear();

    Json(ClearResponse::new())
}

/// Handler for GET /stats
///
/// Returns current cache statistics for external dashboards.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.max_bytes()))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for PUT /persist/set
///
/// Writes a durable record. The store itself absorbs storage failures, so
/// the handler reports whether the write landed.
pub async fn persist_set_handler(
    State(state): State<AppState>,
    Json(req): Json<PersistSetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let store = state.persist_store()?;
    if !store.set(&req.key, req.value, req.ttl_ms).await {
        return Err(CacheError::Unavailable(format!(
            "failed to persist key '{}'",
            req.key
        )));
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /persist/get/:key
pub async fn persist_get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let store = state.persist_store()?;
    match store.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /persist/del/:key
///
/// Idempotent like the in-memory delete.
pub async fn persist_delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let store = state.persist_store()?;
    store.delete(&key).await;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /persist/clear
pub async fn persist_clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let store = state.persist_store()?;
    store.clear().await;

    Ok(Json(ClearResponse::new()))
}
