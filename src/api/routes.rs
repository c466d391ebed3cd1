//! API Routes
//!
//! Configures the Axum router with all store server endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, list_handler, list_key_handler, ping_handler,
    put_handler, shutdown_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|PUT|DELETE /store/:key` - Read, write or remove a key
/// - `GET /list` - List keys visible to the caller
/// - `GET /list/:key` - Describe one key
/// - `GET /stats` - Store statistics
/// - `GET /shutdown` - Stop the server (admin only)
/// - `GET /ping`, `GET /health` - Liveness checks
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/store/:key",
            get(get_handler).put(put_handler).delete(delete_handler),
        )
        .route("/list", get(list_handler))
        .route("/list/:key", get(list_key_handler))
        .route("/stats", get(stats_handler))
        .route("/shutdown", get(shutdown_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
