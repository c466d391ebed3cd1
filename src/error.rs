//! Error types for the key-value store
//!
//! `StoreError` is what the store hands back to callers. `ApiError` wraps it
//! for the HTTP layer and maps each kind to a status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Caller-visible failure of a store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key absent, or not visible to the requester
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key owned by a different principal
    #[error("{requester:?} is not the owner of {key:?}")]
    NotAuthorized { requester: String, key: String },

    /// The store has been closed
    #[error("Store is closed")]
    Closed,
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// == API Error Enum ==
/// Failure of an HTTP request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No usable principal on the request
    #[error("Not authorised")]
    Unauthenticated,

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authenticated but not allowed to perform the action
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::NotAuthorized { .. }) => StatusCode::FORBIDDEN,
            ApiError::Store(StoreError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(StoreError::NotFound("k".into())), StatusCode::NOT_FOUND),
            (
                ApiError::from(StoreError::NotAuthorized {
                    requester: "user_b".into(),
                    key: "k".into(),
                }),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::from(StoreError::Closed), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_not_authorized_message() {
        let err = StoreError::NotAuthorized {
            requester: "user_b".into(),
            key: "k".into(),
        };
        assert_eq!(err.to_string(), r#""user_b" is not the owner of "k""#);
    }
}
