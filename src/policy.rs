//! Eligibility rules for archiving.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::{ARCHIVE_FILE_NAME, MAX_EXPIRATION_DAYS, SECONDS_PER_DAY};
use crate::{Error, Result};

/// Expiration clock for one run.
///
/// `now` is captured once by the caller and every candidate is compared
/// against the same threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    days: i64,
    now: SystemTime,
    threshold: SystemTime,
}

impl Expiry {
    /// Negative `days` put the threshold in the future, so everything is
    /// stale. `days` is capped at [`MAX_EXPIRATION_DAYS`] either way.
    pub fn new(days: i64, now: SystemTime) -> Self {
        let days = days.clamp(-MAX_EXPIRATION_DAYS, MAX_EXPIRATION_DAYS);
        let age = Duration::from_secs(days.unsigned_abs() * SECONDS_PER_DAY);
        let threshold = if days >= 0 {
            now.checked_sub(age).unwrap_or(UNIX_EPOCH).max(UNIX_EPOCH)
        } else {
            now.checked_add(age).unwrap_or(now)
        };
        Self {
            days,
            now,
            threshold,
        }
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn now(&self) -> SystemTime {
        self.now
    }

    /// Instant below which an entry is stale.
    pub fn threshold(&self) -> SystemTime {
        self.threshold
    }

    pub fn is_stale(&self, at: SystemTime) -> bool {
        at < self.threshold
    }
}

/// Metadata of a candidate entry needed for classification.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    /// Absolute path of the entry.
    pub path: PathBuf,

    pub is_dir: bool,

    /// Last content modification.
    pub modified_at: SystemTime,

    /// Last status change (ctime on Unix, creation time elsewhere).
    pub changed_at: SystemTime,

    /// Bytes of a regular file, zero for directories.
    pub size_bytes: u64,
}

impl EntryInfo {
    /// Reads the entry's metadata, following symlinks.
    pub fn inspect(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|source| Error::Inspect {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_metadata(path, &metadata).map_err(|source| Error::Inspect {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_metadata(path: &Path, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            is_dir: metadata.is_dir(),
            modified_at: metadata.modified()?,
            changed_at: status_changed(metadata)?,
            size_bytes: if metadata.is_file() { metadata.len() } else { 0 },
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

#[cfg(unix)]
fn status_changed(metadata: &Metadata) -> std::io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;

    let secs = metadata.ctime();
    let nanos = metadata.ctime_nsec().clamp(0, 999_999_999) as u32;
    let time = if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, nanos)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + Duration::from_nanos(u64::from(nanos))
    };
    Ok(time)
}

#[cfg(not(unix))]
fn status_changed(metadata: &Metadata) -> std::io::Result<SystemTime> {
    metadata.created()
}

/// Whether `entry` is the archive file itself.
///
/// Directories are never treated as the archive, whatever their name.
pub fn is_archive_file(entry: &EntryInfo) -> bool {
    if entry.is_dir {
        return false;
    }
    entry.file_name() == Some(ARCHIVE_FILE_NAME)
}

/// Decide whether an entry should be moved into the archive.
///
/// Stale by modification time OR by status-change time qualifies. The
/// comparison is strict.
pub fn should_be_archived(entry: &EntryInfo, expiry: &Expiry) -> bool {
    if is_archive_file(entry) {
        return false;
    }
    expiry.is_stale(entry.modified_at) || expiry.is_stale(entry.changed_at)
}
