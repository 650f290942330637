//! Retention sweeper for a single directory.
//!
//! Entries directly inside the target directory whose modification or
//! status-change time is older than the expiration threshold are appended
//! to `expired_archive.zip` (XZ members) in that directory and then
//! removed.
//!
//! ```rust,ignore
//! use std::time::SystemTime;
//! use expired_archiver::{SweepConfig, Sweeper};
//!
//! let config = SweepConfig::new("/srv/drop").with_expiration_days(60);
//! let stats = Sweeper::new(config).run_once(SystemTime::now(), &mut std::io::stdout())?;
//! println!("{}", stats.summary());
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod policy;
pub mod remove;
pub mod scan;
pub mod stats;
pub mod sweep;

pub use archive::{ArchivedEntry, ExpiredArchive};
pub use config::{SweepConfig, ARCHIVE_FILE_NAME, DEFAULT_EXPIRATION_DAYS};
pub use error::{ArchiveError, Error, Result};
pub use policy::{should_be_archived, EntryInfo, Expiry};
pub use remove::{delete_archived_file, verify_removed};
pub use scan::{list_entries, ListEntries};
pub use stats::SweepStats;
pub use sweep::Sweeper;
