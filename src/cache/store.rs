//! Cache Store Module
//!
//! Per-tag image table with size accounting, an in-flight fetch registry,
//! expiry sweeping and LRU eviction. All methods are synchronous; callers
//! serialize access through the manager's lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};

use crate::cache::entry::estimate_size;
use crate::cache::{CacheEntry, CacheStats, EvictionCandidate, EvictionPolicy, ImageList};
use crate::provider::ImageRecord;

/// Handle every caller waiting on the same tag awaits.
pub type PendingFetch = Shared<BoxFuture<'static, ImageList>>;

// == Cache Limits ==
/// Freshness window and bounds the store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    pub ttl_ms: u64,
    pub max_entries: usize,
    pub max_size_bytes: u64,
    pub bytes_per_image: u64,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            ttl_ms: crate::cache::CACHE_DURATION_MS,
            max_entries: crate::cache::MAX_CACHE_ENTRIES,
            max_size_bytes: crate::cache::MAX_CACHE_SIZE_BYTES,
            bytes_per_image: crate::cache::IMAGE_SIZE_ESTIMATE,
        }
    }
}

// == Status Snapshots ==
/// Point-in-time view of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStatus {
    pub tag: String,
    pub image_count: usize,
    pub size_bytes: u64,
    pub last_fetched_at: Option<u64>,
    pub last_accessed_at: u64,
    pub age_ms: Option<u64>,
    pub expired: bool,
    pub pending: bool,
}

/// Point-in-time view of the whole store.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub entries: Vec<EntryStatus>,
    pub total_entries: usize,
    pub total_size_bytes: u64,
    pub in_flight: usize,
    pub limits: CacheLimits,
    pub stats: CacheStats,
}

/// What a `clear` removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearSummary {
    pub entries_cleared: usize,
    pub size_cleared_bytes: u64,
}

// == Cache Store ==
/// Image table keyed by tag.
pub struct CacheStore {
    /// Completed and placeholder entries
    entries: HashMap<String, CacheEntry>,
    /// Outstanding fetches, at most one per tag
    in_flight: HashMap<String, PendingFetch>,
    /// Sum of every entry's `size_bytes`
    total_size: u64,
    limits: CacheLimits,
    policy: EvictionPolicy,
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(limits: CacheLimits) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            total_size: 0,
            limits,
            policy: EvictionPolicy::new(limits.max_entries, limits.max_size_bytes),
            stats: CacheStats::new(),
        }
    }

    // == Lookup Fresh ==
    /// Returns the cached images for `tag` if they are inside the freshness
    /// window, marking the entry as accessed.
    pub fn lookup_fresh(&mut self, tag: &str, now: u64) -> Option<ImageList> {
        let ttl = self.limits.ttl_ms;
        let entry = self.entries.get_mut(tag)?;
        if !entry.is_fresh(now, ttl) {
            return None;
        }

        entry.touch(now);
        self.stats.record_hit();
        Some(entry.images.clone())
    }

    // == Join Pending ==
    /// Returns the in-flight fetch for `tag`, counting the caller as coalesced.
    pub fn join_pending(&mut self, tag: &str) -> Option<PendingFetch> {
        let fetch = self.in_flight.get(tag)?.clone();
        self.stats.record_coalesced();
        Some(fetch)
    }

    // == Begin Fetch ==
    /// Registers a new fetch for `tag` and makes sure an entry exists for it.
    ///
    /// Stale images already cached for the tag are kept so they can be
    /// served if the fetch fails.
    pub fn begin_fetch(&mut self, tag: &str, fetch: PendingFetch, now: u64) {
        self.entries
            .entry(tag.to_string())
            .or_insert_with(|| CacheEntry::placeholder(now));
        self.in_flight.insert(tag.to_string(), fetch);
        self.stats.record_miss();
        self.stats.record_fetch();
    }

    // == Complete Fetch ==
    /// Stores a successful fetch result and clears the pending marker.
    ///
    /// Recreates the entry if it was cleared while the fetch ran.
    pub fn complete_fetch(&mut self, tag: &str, images: Vec<ImageRecord>, now: u64) -> ImageList {
        self.in_flight.remove(tag);

        let images: ImageList = Arc::new(images);
        let entry = self
            .entries
            .entry(tag.to_string())
            .or_insert_with(|| CacheEntry::placeholder(now));
        let (old_size, new_size) = entry.refresh(images.clone(), now, self.limits.bytes_per_image);
        self.total_size = self.total_size.saturating_sub(old_size) + new_size;

        images
    }

    // == Fail Fetch ==
    /// Clears the pending marker after a failed fetch and returns what the
    /// caller should see: the previous images if any were ever fetched,
    /// otherwise an empty list.
    ///
    /// A placeholder that never held data is dropped.
    pub fn fail_fetch(&mut self, tag: &str) -> ImageList {
        self.in_flight.remove(tag);

        match self.entries.get(tag) {
            Some(entry) if entry.has_fetched() => {
                let stale = entry.images.clone();
                self.stats.record_fetch_failure(!stale.is_empty());
                stale
            }
            Some(_) => {
                self.remove_entry(tag);
                self.stats.record_fetch_failure(false);
                Arc::new(Vec::new())
            }
            None => {
                self.stats.record_fetch_failure(false);
                Arc::new(Vec::new())
            }
        }
    }

    // == Evict To Bounds ==
    /// Drops least-recently-accessed entries until both bounds hold.
    ///
    /// Returns the evicted tags.
    pub fn evict_to_bounds(&mut self) -> Vec<String> {
        if !self.policy.exceeded(self.entries.len(), self.total_size) {
            return Vec::new();
        }

        let candidates = self
            .entries
            .iter()
            .map(|(tag, entry)| EvictionCandidate {
                tag: tag.clone(),
                last_accessed_at: entry.last_accessed_at,
                size_bytes: entry.size_bytes,
                pending: self.in_flight.contains_key(tag),
            })
            .collect();

        let victims = self.policy.select_victims(candidates, self.total_size);
        for tag in &victims {
            self.remove_entry(tag);
        }
        self.stats.record_evictions(victims.len());

        victims
    }

    // == Sweep Expired ==
    /// Removes every entry past the freshness window that has no fetch in
    /// flight. Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now: u64) -> usize {
        let ttl = self.limits.ttl_ms;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(tag, entry)| !self.in_flight.contains_key(*tag) && entry.is_expired(now, ttl))
            .map(|(tag, _)| tag.clone())
            .collect();

        for tag in &expired {
            self.remove_entry(tag);
        }
        self.stats.record_expired(expired.len());

        expired.len()
    }

    // == Clear ==
    /// Empties the table. In-flight fetches are left running; they
    /// repopulate their tag when they complete.
    pub fn clear(&mut self) -> ClearSummary {
        let summary = ClearSummary {
            entries_cleared: self.entries.len(),
            size_cleared_bytes: self.total_size,
        };

        self.entries.clear();
        self.total_size = 0;

        summary
    }

    // == Status ==
    /// Snapshot of every entry, ordered by tag, plus totals.
    pub fn status(&self, now: u64) -> CacheStatus {
        let ttl = self.limits.ttl_ms;
        let mut entries: Vec<EntryStatus> = self
            .entries
            .iter()
            .map(|(tag, entry)| EntryStatus {
                tag: tag.clone(),
                image_count: entry.images.len(),
                size_bytes: entry.size_bytes,
                last_fetched_at: entry.last_fetched_at,
                last_accessed_at: entry.last_accessed_at,
                age_ms: entry.age_ms(now),
                expired: !entry.is_fresh(now, ttl),
                pending: self.in_flight.contains_key(tag),
            })
            .collect();
        entries.sort_by(|a, b| a.tag.cmp(&b.tag));

        CacheStatus {
            total_entries: entries.len(),
            entries,
            total_size_bytes: self.total_size,
            in_flight: self.in_flight.len(),
            limits: self.limits,
            stats: self.stats.clone(),
        }
    }

    fn remove_entry(&mut self, tag: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(tag)?;
        self.total_size = self.total_size.saturating_sub(entry.size_bytes);
        Some(entry)
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn is_pending(&self, tag: &str) -> bool {
        self.in_flight.contains_key(tag)
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Size the entries would account for if recomputed from scratch.
    pub fn recomputed_size(&self) -> u64 {
        self.entries
            .values()
            .map(|e| estimate_size(e.images.len(), self.limits.bytes_per_image))
            .sum()
    }

    pub fn limits(&self) -> CacheLimits {
        self.limits
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries)
            .field("in_flight", &self.in_flight.keys().collect::<Vec<_>>())
            .field("total_size", &self.total_size)
            .field("limits", &self.limits)
            .finish()
    }
}
