//! Entry Module
//!
//! Defines a single stored value together with its owner and usage telemetry.

use std::time::{SystemTime, UNIX_EPOCH};

// == Entry ==
/// A live key-value pair and the metadata tracked for it.
///
/// `key` and `owner` are fixed at creation. The counters only move forward,
/// through the store's telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    /// The stored value
    pub value: String,
    owner: String,
    writes: u64,
    reads: u64,
    /// Last Get/Put timestamp (Unix milliseconds)
    pub last_access: u64,
}

impl Entry {
    // == Constructor ==
    /// Creates a freshly written entry: `writes = 1`, `reads = 0`.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `owner` - Principal that created the entry
    /// * `now` - Creation timestamp (Unix milliseconds)
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        owner: impl Into<String>,
        now: u64,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            owner: owner.into(),
            writes: 1,
            reads: 0,
            last_access: now,
        }
    }

    /// The key this entry is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Principal that created the entry.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of successful writes (creation counts as one).
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Number of successful reads.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub(crate) fn count_write(&mut self) {
        self.writes += 1;
    }

    pub(crate) fn count_read(&mut self) {
        self.reads += 1;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
