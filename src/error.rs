use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while appending to or finalizing the archive container.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot list directory {}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read metadata of {}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {} to archive", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },
    #[error("cannot remove {}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to delete file: {} still exists", path.display())]
    StillExists { path: PathBuf },
}

impl Error {
    /// Path of the entry (or target directory) the failure is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::List { path, .. }
            | Error::Inspect { path, .. }
            | Error::Write { path, .. }
            | Error::Remove { path, .. }
            | Error::StillExists { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_path() {
        let err = Error::StillExists {
            path: PathBuf::from("/data/old.txt"),
        };
        assert_eq!(err.to_string(), "unable to delete file: /data/old.txt still exists");
        assert_eq!(err.path(), std::path::Path::new("/data/old.txt"));
    }

    #[test]
    fn io_cause_is_exposed_as_source() {
        let err = Error::List {
            path: PathBuf::from("/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "gone");
    }
}
