//! Remote Image Provider Module
//!
//! The narrow interface the cache uses to fetch image metadata by tag,
//! plus the concrete HTTP implementation and an in-memory stub.

mod http;
mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use http::HttpImageProvider;
pub use stub::StubProvider;

// == Image Record ==
/// Image metadata as returned by the remote image API.
///
/// The cache only counts records; everything beyond the identifier and
/// dimensions is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(alias = "fileId", alias = "public_id")]
    pub id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            url: None,
            name: None,
            tags: None,
            extra: serde_json::Map::new(),
        }
    }
}

// == Provider Trait ==
/// Source of image metadata, looked up by tag.
///
/// Implementations may be slow or fail; the cache absorbs both.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Fetches up to `limit` records carrying `tag`, in the provider's order.
    async fn fetch_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<ImageRecord>>;
}
