//! Error types for the gallery cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Challenge sent with every 401 from the admin surface.
pub const ADMIN_CHALLENGE: &str = "Bearer realm=\"gallery-admin\"";

// == Cache Error Enum ==
/// Unified error type for the gallery cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Remote image API returned an unusable answer
    #[error("Provider error: {0}")]
    Provider(String),

    /// Transport failure talking to the remote image API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Admin credential missing, wrong, or admin access disabled
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::Provider(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::Http(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            CacheError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message));

        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [(header::WWW_AUTHENTICATE, ADMIN_CHALLENGE)],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gallery cache.
pub type Result<T> = std::result::Result<T, CacheError>;
