//! API Module
//!
//! HTTP handlers and routing for the store server REST API.
//!
//! # Endpoints
//! - `GET /store/:key` - Retrieve a value
//! - `PUT /store/:key` - Store the request body under a key
//! - `DELETE /store/:key` - Delete a key
//! - `GET /list`, `GET /list/:key` - Key listings with usage telemetry
//! - `GET /stats` - Store statistics
//! - `GET /shutdown` - Graceful shutdown (admin only)
//! - `GET /ping`, `GET /health` - Liveness checks

pub mod handlers;
pub mod principal;
pub mod routes;

pub use handlers::*;
pub use principal::Principal;
pub use routes::create_router;
