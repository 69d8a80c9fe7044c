//! Response DTOs for the gallery cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::cache::{CacheStats, CacheStatus, ClearSummary, EntryStatus, ImageList};
use crate::provider::ImageRecord;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Formats a Unix-millisecond timestamp as ISO 8601 (UTC, millisecond precision).
pub fn iso8601(ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Response body for `GET /api/galleries/:tag/images`
#[derive(Debug, Clone, Serialize)]
pub struct GalleryImagesResponse {
    pub tag: String,
    pub count: usize,
    pub images: Vec<ImageRecord>,
}

impl GalleryImagesResponse {
    /// Builds the response, returning at most `limit` images.
    pub fn new(tag: impl Into<String>, images: &ImageList, limit: usize) -> Self {
        let images: Vec<ImageRecord> = images.iter().take(limit).cloned().collect();
        Self {
            tag: tag.into(),
            count: images.len(),
            images,
        }
    }
}

/// One row of the admin status listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryResponse {
    pub tag: String,
    pub image_count: usize,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    pub last_fetched: Option<String>,
    pub last_accessed: String,
    pub age_seconds: Option<u64>,
    pub expired: bool,
    pub has_active_request: bool,
}

impl From<&EntryStatus> for CacheEntryResponse {
    fn from(entry: &EntryStatus) -> Self {
        Self {
            tag: entry.tag.clone(),
            image_count: entry.image_count,
            size_kb: round2(entry.size_bytes as f64 / KIB),
            last_fetched: entry.last_fetched_at.map(iso8601),
            last_accessed: iso8601(entry.last_accessed_at),
            age_seconds: entry.age_ms.map(|ms| ms / 1000),
            expired: entry.expired,
            has_active_request: entry.pending,
        }
    }
}

/// Response body for `GET /admin/cache-status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusResponse {
    pub cache_entries: Vec<CacheEntryResponse>,
    pub total_entries: usize,
    #[serde(rename = "totalSizeMB")]
    pub total_size_mb: f64,
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: f64,
    pub max_entries: usize,
    pub cache_duration_seconds: u64,
    pub active_requests: usize,
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStatus> for CacheStatusResponse {
    fn from(status: CacheStatus) -> Self {
        Self {
            cache_entries: status.entries.iter().map(CacheEntryResponse::from).collect(),
            total_entries: status.total_entries,
            total_size_mb: round2(status.total_size_bytes as f64 / MIB),
            max_size_mb: round2(status.limits.max_size_bytes as f64 / MIB),
            max_entries: status.limits.max_entries,
            cache_duration_seconds: status.limits.ttl_ms / 1000,
            active_requests: status.in_flight,
            hit_rate: status.stats.hit_rate(),
            stats: status.stats,
        }
    }
}

/// Response body for `POST /admin/clear-cache`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponse {
    pub message: String,
    pub entries_cleared: usize,
    /// Kilobytes
    pub size_cleared: f64,
}

impl From<ClearSummary> for ClearCacheResponse {
    fn from(summary: ClearSummary) -> Self {
        Self {
            message: format!("Cache cleared: {} entries removed", summary.entries_cleared),
            entries_cleared: summary.entries_cleared,
            size_cleared: round2(summary.size_cleared_bytes as f64 / KIB),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
