//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables.

use std::env;
use std::path::PathBuf;

use crate::cache::DEFAULT_MAX_BYTES;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory budget for the in-memory cache, in approximate bytes
    pub max_bytes: usize,
    /// TTL sweep task interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Memory pressure check interval in milliseconds (longer than the sweep)
    pub pressure_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Directory for the persistent store; None disables persistence
    pub persist_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_BYTES` - Memory budget in bytes (default: 5 MiB)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in ms (default: 60000)
    /// - `PRESSURE_INTERVAL_MS` - Pressure check frequency in ms (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PERSIST_DIR` - Persistent store directory (default: disabled)
    pub fn from_env() -> Self {
        Self {
            max_bytes: env::var("MAX_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BYTES),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
            pressure_interval_ms: env::var("PRESSURE_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            persist_dir: env::var("PERSIST_DIR").ok().map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            sweep_interval_ms: 60_000,
            pressure_interval_ms: 300_000,
            server_port: 3000,
            persist_dir: None,
        }
    }
}
