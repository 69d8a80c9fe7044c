//! Cache Entry Module
//!
//! Defines the per-tag entry holding fetched image metadata and its timestamps.

use std::sync::Arc;

use crate::provider::ImageRecord;

/// Shared, immutable list of image records as handed to renderers.
pub type ImageList = Arc<Vec<ImageRecord>>;

// == Cache Entry ==
/// Images cached for one tag plus the metadata eviction and expiry need.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Records in the provider's return order
    pub images: ImageList,
    /// Last successful fetch (Unix milliseconds), None for a placeholder
    pub last_fetched_at: Option<u64>,
    /// Last successful read (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Estimated footprint: image count times the per-image estimate
    pub size_bytes: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an empty placeholder for a tag whose first fetch is starting.
    pub fn placeholder(now: u64) -> Self {
        Self {
            images: Arc::new(Vec::new()),
            last_fetched_at: None,
            last_accessed_at: now,
            size_bytes: 0,
        }
    }

    // == Replace Images ==
    /// Stores a freshly fetched list and returns the size delta to apply
    /// to the store total as (old, new).
    pub fn refresh(&mut self, images: ImageList, now: u64, bytes_per_image: u64) -> (u64, u64) {
        let old_size = self.size_bytes;
        self.size_bytes = estimate_size(images.len(), bytes_per_image);
        self.images = images;
        self.last_fetched_at = Some(now);
        self.last_accessed_at = now;
        (old_size, self.size_bytes)
    }

    // == Touch ==
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = self.last_accessed_at.max(now);
    }

    // == Freshness ==
    /// True while the last fetch is younger than `ttl_ms`.
    ///
    /// A placeholder that never completed a fetch is never fresh.
    pub fn is_fresh(&self, now: u64, ttl_ms: u64) -> bool {
        match self.last_fetched_at {
            Some(fetched) => now.saturating_sub(fetched) < ttl_ms,
            None => false,
        }
    }

    // == Expiry ==
    /// True once the last fetch is strictly older than `ttl_ms`.
    ///
    /// Used by the sweeper; an entry exactly `ttl_ms` old is stale for
    /// reads but survives the sweep.
    pub fn is_expired(&self, now: u64, ttl_ms: u64) -> bool {
        match self.last_fetched_at {
            Some(fetched) => now.saturating_sub(fetched) > ttl_ms,
            None => true,
        }
    }

    /// True if a fetch has completed at least once for this tag.
    pub fn has_fetched(&self) -> bool {
        self.last_fetched_at.is_some()
    }

    /// Age of the cached data in milliseconds.
    pub fn age_ms(&self, now: u64) -> Option<u64> {
        self.last_fetched_at.map(|fetched| now.saturating_sub(fetched))
    }
}

/// Size estimate for `count` images.
pub fn estimate_size(count: usize, bytes_per_image: u64) -> u64 {
    count as u64 * bytes_per_image
}
