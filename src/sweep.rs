//! One pass over the target directory: list, classify, archive, remove.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use crate::archive::ExpiredArchive;
use crate::config::SweepConfig;
use crate::policy::{should_be_archived, EntryInfo, Expiry};
use crate::remove::delete_archived_file;
use crate::scan::list_entries;
use crate::stats::SweepStats;
use crate::{Error, Result};

pub struct Sweeper {
    config: SweepConfig,
}

impl Sweeper {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Run the sweep once against the clock reading `now`.
    ///
    /// The absolute path of every archived entry is written to `out` as a
    /// line before the entry is archived. Stops at the first error; entries
    /// handled before it stay archived and removed.
    pub fn run_once<W: Write>(&mut self, now: SystemTime, out: &mut W) -> Result<SweepStats> {
        let start = Instant::now();
        let mut stats = SweepStats::new();
        let expiry = Expiry::new(self.config.expiration_days, now);

        let listing = list_entries(&self.config.root)?;
        let root = listing.root().to_path_buf();
        let entries = listing.collect::<Result<Vec<PathBuf>>>()?;
        stats.scanned_count = entries.len();
        log::debug!(
            "{} entries in {}, threshold {} days",
            entries.len(),
            root.display(),
            expiry.days()
        );

        let mut archive = ExpiredArchive::open(&root)?;
        for path in &entries {
            let info = EntryInfo::inspect(path)?;
            if !should_be_archived(&info, &expiry) {
                log::debug!("keeping {}", path.display());
                stats.record_skipped();
                continue;
            }

            report(out, path)?;
            let archived = archive.archive(&info)?;
            delete_archived_file(path)?;
            log::debug!("archived {} as {}", path.display(), archived.name);
            stats.record_archived(&archived);
        }
        archive.finish()?;

        stats.duration = start.elapsed();
        Ok(stats)
    }
}

fn report<W: Write>(out: &mut W, path: &Path) -> Result<()> {
    writeln!(out, "{}", path.display())
        .and_then(|_| out.flush())
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source: source.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_directory_creates_empty_archive() {
        let dir = tempdir().expect("tempdir");
        let mut sweeper = Sweeper::new(SweepConfig::new(dir.path()));
        let mut out = Vec::new();

        let stats = sweeper.run_once(SystemTime::now(), &mut out).expect("run");
        assert_eq!(stats.scanned_count, 0);
        assert_eq!(stats.archived_count, 0);
        assert!(out.is_empty());
        assert!(dir.path().join(crate::ARCHIVE_FILE_NAME).exists());
    }

    #[test]
    fn fresh_files_are_kept() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), b"a").expect("write");

        let mut sweeper = Sweeper::new(SweepConfig::new(dir.path()).with_expiration_days(1));
        let mut out = Vec::new();
        let stats = sweeper.run_once(SystemTime::now(), &mut out).expect("run");

        assert_eq!(stats.scanned_count, 1);
        assert_eq!(stats.skipped_count, 1);
        assert!(dir.path().join("a.txt").exists());
        assert!(out.is_empty());
    }

    #[test]
    fn missing_root_fails_before_creating_archive() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        let mut sweeper = Sweeper::new(SweepConfig::new(&missing));

        let err = sweeper
            .run_once(SystemTime::now(), &mut Vec::new())
            .expect_err("missing root");
        assert!(matches!(err, Error::List { .. }));
        assert!(!missing.exists());
    }
}
