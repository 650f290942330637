//! Sweep configuration.

use std::path::PathBuf;

/// Reserved name of the archive file kept inside the target directory.
pub const ARCHIVE_FILE_NAME: &str = "expired_archive.zip";

/// Age used when the caller has no opinion.
pub const DEFAULT_EXPIRATION_DAYS: i64 = 60;

/// Larger magnitudes are treated as this many days (about 2700 years).
pub const MAX_EXPIRATION_DAYS: i64 = 1_000_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Configuration for a single sweep of one directory.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Directory to scan and archive into.
    pub root: PathBuf,

    /// Entries older than this many days are archived.
    /// Negative values make every entry stale.
    pub expiration_days: i64,
}

impl SweepConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            expiration_days: DEFAULT_EXPIRATION_DAYS,
        }
    }

    pub fn with_expiration_days(mut self, days: i64) -> Self {
        self.expiration_days = days;
        self
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE_NAME)
    }
}
