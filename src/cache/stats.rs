//! Cache Statistics Module
//!
//! Counts how requests were served and what the cache removed.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity since start-up. Survives `clear`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Requests answered from a fresh entry
    pub hits: u64,
    /// Requests that needed a fetch (started or joined)
    pub misses: u64,
    /// Requests that joined a fetch already in flight
    pub coalesced: u64,
    /// Fetches started against the provider
    pub fetches: u64,
    /// Fetches that failed
    pub fetch_failures: u64,
    /// Failed fetches answered with previously cached images
    pub stale_served: u64,
    /// Entries removed by the LRU bound
    pub evictions: u64,
    /// Entries removed by the expiry sweep
    pub expired_removed: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// A miss that attached to an in-flight fetch.
    pub fn record_coalesced(&mut self) {
        self.misses += 1;
        self.coalesced += 1;
    }

    pub fn record_fetch(&mut self) {
        self.fetches += 1;
    }

    pub fn record_fetch_failure(&mut self, served_stale: bool) {
        self.fetch_failures += 1;
        if served_stale {
            self.stale_served += 1;
        }
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired_removed += count as u64;
    }
}
