//! Background Tasks Module
//!
//! Periodic maintenance that runs for the lifetime of the process.
//!
//! # Tasks
//! - TTL sweep: removes expired cache entries at configured intervals
//! - Memory pressure: evicts one LRU entry when over the high-water mark

mod maintenance;

pub use maintenance::{spawn_pressure_task, spawn_sweep_task, MaintenanceHandles};
