//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, persist_clear_handler,
    persist_delete_handler, persist_get_handler, persist_set_handler, set_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key (`?version=` checks the tag)
/// - `DELETE /del/:key` - Delete a key (idempotent)
/// - `POST /clear` - Remove all entries
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
/// - `PUT /persist/set`, `GET /persist/get/:key`, `DELETE /persist/del/:key`,
///   `POST /persist/clear` - Same contract against the durable store
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/persist/set", put(persist_set_handler))
        .route("/persist/get/:key", get(persist_get_handler))
        .route("/persist/del/:key", delete(persist_delete_handler))
        .route("/persist/clear", post(persist_clear_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
