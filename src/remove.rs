use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Deletes an entry that has been archived and checks that it is gone.
///
/// Symlinks are unlinked, never followed.
pub fn delete_archived_file(path: &Path) -> Result<()> {
    let remove = |source: std::io::Error| Error::Remove {
        path: path.to_path_buf(),
        source,
    };

    let file_type = fs::symlink_metadata(path).map_err(remove)?.file_type();
    if file_type.is_dir() {
        fs::remove_dir_all(path).map_err(remove)?;
    } else {
        fs::remove_file(path).map_err(remove)?;
    }

    verify_removed(path)?;
    log::debug!("removed {}", path.display());
    Ok(())
}

/// Fails with [`Error::StillExists`] if anything, even a dangling link, is
/// still at `path`.
pub fn verify_removed(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(Error::StillExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
