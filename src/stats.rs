//! Statistics for a sweep.

use std::time::Duration;

use crate::archive::ArchivedEntry;

/// Statistics from one sweep of a directory.
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    /// Number of candidate entries listed.
    pub scanned_count: usize,

    /// Number of entries archived and removed.
    pub archived_count: usize,

    /// Number of entries left in place.
    pub skipped_count: usize,

    /// Archive members written, counting everything under archived directories.
    pub members_written: u64,

    /// Source bytes read into the archive.
    pub bytes_archived: u64,

    /// Time taken for the run.
    pub duration: Duration,
}

impl SweepStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_archived(&mut self, entry: &ArchivedEntry) {
        self.archived_count += 1;
        self.members_written += entry.members;
        self.bytes_archived = self.bytes_archived.saturating_add(entry.bytes);
    }

    pub fn record_skipped(&mut self) {
        self.skipped_count += 1;
    }

    pub fn summary(&self) -> String {
        format!(
            "Scanned: {}, Archived: {}, Skipped: {}, Members: {}, Bytes: {}, Duration: {:?}",
            self.scanned_count,
            self.archived_count,
            self.skipped_count,
            self.members_written,
            self.bytes_archived,
            self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_stats_default() {
        let stats = SweepStats::default();
        assert_eq!(stats.scanned_count, 0);
        assert_eq!(stats.archived_count, 0);
        assert_eq!(stats.skipped_count, 0);
        assert_eq!(stats.bytes_archived, 0);
    }

    #[test]
    fn test_record_archived() {
        let mut stats = SweepStats::new();
        stats.record_archived(&ArchivedEntry {
            name: "srv/old.txt".to_string(),
            members: 1,
            bytes: 100,
        });
        stats.record_archived(&ArchivedEntry {
            name: "srv/old_dir".to_string(),
            members: 3,
            bytes: 50,
        });
        stats.record_skipped();

        assert_eq!(stats.archived_count, 2);
        assert_eq!(stats.members_written, 4);
        assert_eq!(stats.bytes_archived, 150);
        assert_eq!(stats.skipped_count, 1);
    }

    #[test]
    fn test_summary() {
        let mut stats = SweepStats::new();
        stats.scanned_count = 10;
        stats.archived_count = 4;
        stats.skipped_count = 6;
        stats.duration = Duration::from_secs(2);

        let summary = stats.summary();
        assert!(summary.contains("Scanned: 10"));
        assert!(summary.contains("Archived: 4"));
        assert!(summary.contains("Skipped: 6"));
    }
}
