//! Cache Module
//!
//! In-memory image-metadata cache with request coalescing, LRU/size-bounded
//! eviction and time-based expiry.

mod clock;
mod entry;
mod eviction;
mod manager;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, ImageList};
pub use eviction::{EvictionCandidate, EvictionPolicy};
pub use manager::ImageCache;
pub use stats::CacheStats;
pub use store::{CacheLimits, CacheStatus, CacheStore, ClearSummary, EntryStatus, PendingFetch};

// == Public Constants ==
/// Freshness window for a fetched tag
pub const CACHE_DURATION_MS: u64 = 5 * 60 * 1000;

/// Maximum number of cached tags
pub const MAX_CACHE_ENTRIES: usize = 20;

/// Maximum aggregate estimated size
pub const MAX_CACHE_SIZE_BYTES: u64 = 50 * 1024 * 1024; // 50 MiB

/// Bytes accounted per cached image record
pub const IMAGE_SIZE_ESTIMATE: u64 = 1024;

/// Provider result limit used when the caller does not give one
pub const DEFAULT_IMAGE_LIMIT: usize = 400;
