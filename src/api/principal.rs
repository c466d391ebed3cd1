//! Principal Extraction
//!
//! Pulls the already-authenticated principal off a request. The
//! `Authorization` header value is taken as the principal name; bearer tokens
//! are issued and verified elsewhere and are not accepted here.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;

/// The principal a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        if name.is_empty() || name.starts_with("Bearer") {
            return Err(ApiError::Unauthenticated);
        }

        Ok(Principal(name.to_string()))
    }
}
