//! Response models for the store server API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies. Store listings reuse [`crate::store::ListEntry`].

pub mod responses;

// Re-export commonly used types
pub use responses::{
    DeleteResponse, ErrorResponse, GetResponse, HealthResponse, PutResponse, ShutdownResponse,
    StatsResponse,
};
