//! Store Statistics Module
//!
//! Store-wide counters for Get outcomes, rejected mutations and evictions.

use serde::Serialize;

// == Store Stats ==
/// Store-wide operation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Number of successful Gets
    pub hits: u64,
    /// Number of Gets that returned NotFound
    pub misses: u64,
    /// Number of entries dropped by the eviction policy
    pub evictions: u64,
    /// Number of Puts/Deletes rejected as NotAuthorized
    pub rejected: u64,
    /// Current number of live entries
    pub total_entries: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no Gets have been made.
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

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    // == Update Entry Count ==
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
