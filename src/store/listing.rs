//! Listing Service
//!
//! Builds owner-filtered snapshots of the store. Every function here takes a
//! shared borrow of the core, so a snapshot can never touch recency or
//! counters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::store::{auth, telemetry, Entry, StorageCore};

// == List Entry ==
/// Point-in-time view of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub key: String,
    pub owner: String,
    pub writes: u64,
    pub reads: u64,
    /// Milliseconds since the last Get or Put
    pub age_millis: u64,
}

impl ListEntry {
    /// Snapshots `entry` as seen at `now`.
    pub fn from_entry(entry: &Entry, now: u64) -> Self {
        Self {
            key: entry.key().to_string(),
            owner: entry.owner().to_string(),
            writes: entry.writes(),
            reads: entry.reads(),
            age_millis: telemetry::age_ms(entry, now),
        }
    }
}

/// Snapshots every entry visible to `requester`, most recently used first.
///
/// Admin sees everything; anyone else sees only the entries they own.
pub fn snapshot_all(core: &StorageCore, requester: &str, now: u64) -> Vec<ListEntry> {
    core.iter()
        .filter(|entry| auth::visible(requester, entry.owner()))
        .map(|entry| ListEntry::from_entry(entry, now))
        .collect()
}

/// Snapshots a single entry.
///
/// An entry the requester cannot see is reported as `NotFound`.
pub fn snapshot_one(
    core: &StorageCore,
    key: &str,
    requester: &str,
    now: u64,
) -> Result<ListEntry> {
    core.lookup(key)
        .filter(|entry| auth::visible(requester, entry.owner()))
        .map(|entry| ListEntry::from_entry(entry, now))
        .ok_or_else(|| StoreError::NotFound(key.to_string()))
}
