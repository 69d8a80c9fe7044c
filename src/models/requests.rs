//! Request DTOs for the gallery cache API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

/// Longest tag accepted on the gallery route
pub const MAX_TAG_LENGTH: usize = 128;

/// Largest result limit a caller may ask the provider for
pub const MAX_IMAGE_LIMIT: usize = 1000;

/// Query string for `GET /api/galleries/:tag/images`
///
/// # Fields
/// - `limit`: Optional provider result limit (uses the configured default if absent)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ImagesQuery {
    /// Resolves the effective limit.
    ///
    /// Returns an error message if the requested limit is out of range.
    pub fn resolve_limit(&self, default_limit: usize) -> Result<usize, String> {
        match self.limit {
            None => Ok(default_limit),
            Some(0) => Err("limit must be at least 1".to_string()),
            Some(limit) if limit > MAX_IMAGE_LIMIT => Err(format!(
                "limit exceeds maximum of {}",
                MAX_IMAGE_LIMIT
            )),
            Some(limit) => Ok(limit),
        }
    }
}

/// Validates a gallery tag taken from the route.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_tag(tag: &str) -> Option<String> {
    if tag.trim().is_empty() {
        return Some("Tag cannot be empty".to_string());
    }
    if tag.len() > MAX_TAG_LENGTH {
        return Some(format!(
            "Tag exceeds maximum length of {} characters",
            MAX_TAG_LENGTH
        ));
    }
    None
}
