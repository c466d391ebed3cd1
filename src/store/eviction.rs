//! Eviction Policy
//!
//! Trims the store back to its configured depth after a Put.

use crate::store::{Entry, StorageCore};

// == Eviction Policy ==
/// LRU eviction bounded by a depth. Depth 0 means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    depth: usize,
}

impl EvictionPolicy {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    // == Sweep ==
    /// Removes least recently used entries until the store fits the depth.
    ///
    /// Ownership is ignored. Returns the dropped entries, oldest first.
    pub fn sweep(&self, core: &mut StorageCore) -> Vec<Entry> {
        let mut evicted = Vec::new();
        if self.depth == 0 {
            return evicted;
        }

        while core.len() > self.depth {
            match core.remove_tail() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        evicted
    }
}
