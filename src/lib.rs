//! KV Store - An in-memory key-value store server
//!
//! Provides owner-checked reads and writes with LRU eviction and per-key
//! usage telemetry, serialized through a single store worker.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use error::{ApiError, StoreError};
pub use store::{Store, StoreConfig};
