//! Cache Statistics Module
//!
//! Point-in-time snapshot of cache performance counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the hit/miss counters and entry count.
///
/// Counters live for the process lifetime and are reset only by `clear`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Current number of stored entries
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a snapshot from raw counter values.
    pub fn new(hits: u64, misses: u64, entries: usize) -> Self {
        Self {
            hits,
            misses,
            entries,
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
