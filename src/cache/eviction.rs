//! Eviction Policy Module
//!
//! Picks least-recently-accessed entries to drop when the cache exceeds
//! its entry-count or estimated-size bound.

// == Eviction Candidate ==
/// Snapshot of one entry as seen by the eviction pass.
#[derive(Debug, Clone)]
pub struct EvictionCandidate {
    pub tag: String,
    pub last_accessed_at: u64,
    pub size_bytes: u64,
    /// Entries with a fetch in flight are never chosen
    pub pending: bool,
}

// == Eviction Policy ==
/// Entry-count and aggregate-size bounds with LRU victim selection.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    pub max_entries: usize,
    pub max_size_bytes: u64,
}

impl EvictionPolicy {
    pub fn new(max_entries: usize, max_size_bytes: u64) -> Self {
        Self {
            max_entries,
            max_size_bytes,
        }
    }

    // == Exceeded ==
    /// True if either bound is violated.
    pub fn exceeded(&self, entry_count: usize, total_size: u64) -> bool {
        entry_count > self.max_entries || total_size > self.max_size_bytes
    }

    // == Select Victims ==
    /// Returns the tags to remove, oldest access first, until both bounds hold.
    ///
    /// Pending entries are skipped and the scan continues past them, so the
    /// result may leave the bounds violated when only pending entries remain.
    /// Ties on `last_accessed_at` keep the order they were given in.
    pub fn select_victims(
        &self,
        mut candidates: Vec<EvictionCandidate>,
        total_size: u64,
    ) -> Vec<String> {
        let mut count = candidates.len();
        let mut size = total_size;

        if !self.exceeded(count, size) {
            return Vec::new();
        }

        candidates.sort_by_key(|c| c.last_accessed_at);

        let mut victims = Vec::new();
        for candidate in candidates {
            if !self.exceeded(count, size) {
                break;
            }
            if candidate.pending {
                continue;
            }
            count -= 1;
            size = size.saturating_sub(candidate.size_bytes);
            victims.push(candidate.tag);
        }

        victims
    }
}
