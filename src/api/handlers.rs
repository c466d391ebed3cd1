//! API Handlers
//!
//! HTTP request handlers for each store server endpoint. Handlers translate
//! HTTP into store calls and nothing more; ownership and eviction are decided
//! inside the store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::Notify;
use tracing::info;

use super::principal::Principal;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, PutResponse, ShutdownResponse, StatsResponse,
};
use crate::store::{ListEntry, Store, ADMIN};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the store worker
    pub store: Store,
    /// Signalled when an admin requests shutdown
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Creates a new AppState around a running store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawns a store configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Store::new(config.store_config()))
    }
}

fn validate_key(key: &str) -> ApiResult<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(ApiError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Handler for GET /store/:key
pub async fn get_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    validate_key(&key)?;
    let value = state.store.get(&key, principal.as_str()).await?;
    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for PUT /store/:key
///
/// The raw request body is the value; an empty body is rejected.
pub async fn put_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(key): Path<String>,
    body: String,
) -> ApiResult<Json<PutResponse>> {
    validate_key(&key)?;
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("Value cannot be empty".to_string()));
    }

    state.store.put(&key, &body, principal.as_str()).await?;
    Ok(Json(PutResponse::new(key)))
}

/// Handler for DELETE /store/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(key): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    validate_key(&key)?;
    state.store.delete(&key, principal.as_str()).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /list
pub async fn list_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<ListEntry>>> {
    let entries = state.store.list(principal.as_str()).await?;
    Ok(Json(entries))
}

/// Handler for GET /list/:key
pub async fn list_key_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(key): Path<String>,
) -> ApiResult<Json<ListEntry>> {
    validate_key(&key)?;
    let entry = state.store.list_one(&key, principal.as_str()).await?;
    Ok(Json(entry))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.store.stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /shutdown
///
/// Only the admin principal may stop the server.
pub async fn shutdown_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<ShutdownResponse>> {
    if principal.as_str() != ADMIN {
        return Err(ApiError::Forbidden(
            "only admin may shut down the server".to_string(),
        ));
    }

    info!(user = principal.as_str(), "Shutdown requested");
    state.shutdown.notify_one();
    Ok(Json(ShutdownResponse::accepted()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /ping
pub async fn ping_handler() -> Json<&'static str> {
    Json("pong")
}
