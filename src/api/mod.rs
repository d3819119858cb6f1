//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key (`?version=` checks the tag)
//! - `DELETE /del/:key` - Delete a key (idempotent)
//! - `POST /clear` - Remove all entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//! - `/persist/*` - Same contract against the durable store

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
