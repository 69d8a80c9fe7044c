//! Admin Access Module
//!
//! Shared-secret gate for the cache admin endpoints. With no secret
//! configured the admin surface is disabled rather than open.

use axum::http::{header, HeaderMap};
use tracing::warn;

use crate::error::{CacheError, Result};

/// Bearer-token check for admin operations.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    token: Option<String>,
}

impl AdminGate {
    /// Empty tokens are treated as unset.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    // == Validate Access ==
    /// True only if a secret is configured and `credential` equals it exactly.
    pub fn validate_access(&self, credential: Option<&str>) -> bool {
        let Some(expected) = self.token.as_deref() else {
            warn!("Admin request rejected: CACHE_ADMIN_TOKEN is not configured");
            return false;
        };

        credential.is_some_and(|presented| presented == expected)
    }

    // == Authorize ==
    /// Checks the request's `Authorization: Bearer` header.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<()> {
        if self.validate_access(bearer_credential(headers)) {
            Ok(())
        } else {
            Err(CacheError::Unauthorized(
                "Valid admin bearer token required".to_string(),
            ))
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}
