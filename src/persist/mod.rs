//! Persistence Module
//!
//! Durable per-key records for larger, slower-changing payloads that should
//! survive a restart. A best-effort optimization layer, never a source of
//! truth.

mod store;

pub use store::{PersistError, PersistentEntry, PersistentStore};
