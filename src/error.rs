//! Error types for the cache service
//!
//! The library layer is fail-open and surfaces misses as `None`/`false`;
//! these error types exist for the HTTP surface, which needs to map
//! outcomes to status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found, expired, or version-mismatched (all surface as a miss)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Entry is larger than the entire cache budget
    #[error("Entry too large: {0}")]
    TooLarge(String),

    /// A configured-off or unavailable subsystem was requested
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::TooLarge(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP surface.
pub type Result<T> = std::result::Result<T, CacheError>;
