//! Store Module
//!
//! Owned key-value storage with LRU eviction, serialized through a single
//! worker task.

pub mod auth;
mod entry;
mod eviction;
pub mod listing;
mod serializer;
mod stats;
mod storage;
pub mod telemetry;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use auth::ADMIN;
pub use entry::{current_timestamp_ms, Entry};
pub use eviction::EvictionPolicy;
pub use listing::ListEntry;
pub use serializer::{Store, StoreConfig, StoreState, DEFAULT_QUEUE_CAPACITY};
pub use stats::StoreStats;
pub use storage::{Iter, StorageCore};
