//! Telemetry Recorder
//!
//! Per-entry read/write counters and last-access age.

use crate::store::Entry;

/// Records a successful Put on `entry`.
pub fn record_write(entry: &mut Entry, now: u64) {
    entry.count_write();
    entry.last_access = now;
}

/// Records a successful Get on `entry`.
pub fn record_read(entry: &mut Entry, now: u64) {
    entry.count_read();
    entry.last_access = now;
}

/// Milliseconds since the entry was last read or written.
///
/// Saturates at zero if the clock went backwards.
pub fn age_ms(entry: &Entry, now: u64) -> u64 {
    now.saturating_sub(entry.last_access)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_write() {
        let mut entry = Entry::new("k", "v", "user_a", 100);
        record_write(&mut entry, 250);

        assert_eq!(entry.writes(), 2);
        assert_eq!(entry.reads(), 0);
        assert_eq!(entry.last_access, 250);
    }

    #[test]
    fn test_record_read() {
        let mut entry = Entry::new("k", "v", "user_a", 100);
        record_read(&mut entry, 300);
        record_read(&mut entry, 400);

        assert_eq!(entry.writes(), 1);
        assert_eq!(entry.reads(), 2);
        assert_eq!(entry.last_access, 400);
    }

    #[test]
    fn test_age() {
        let entry = Entry::new("k", "v", "user_a", 1_000);
        assert_eq!(age_ms(&entry, 1_500), 500);
        assert_eq!(age_ms(&entry, 1_000), 0);
        // Clock stepped backwards
        assert_eq!(age_ms(&entry, 900), 0);
    }
}
