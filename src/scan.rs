use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Iterator over the direct children of one directory, as absolute paths.
///
/// Not restartable; call [`list_entries`] again for a fresh listing.
#[derive(Debug)]
pub struct ListEntries {
    root: PathBuf,
    inner: ReadDir,
}

/// Lists the immediate entries of `dir`, files and subdirectories alike.
pub fn list_entries(dir: &Path) -> Result<ListEntries> {
    let root = std::path::absolute(dir).map_err(|source| Error::List {
        path: dir.to_path_buf(),
        source,
    })?;
    let inner = fs::read_dir(&root).map_err(|source| Error::List {
        path: root.clone(),
        source,
    })?;
    Ok(ListEntries { root, inner })
}

impl ListEntries {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for ListEntries {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(
            entry
                .map(|entry| self.root.join(entry.file_name()))
                .map_err(|source| Error::List {
                    path: self.root.clone(),
                    source,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_one_level_only() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), b"a").expect("write a");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("sub").join("nested.txt"), b"n").expect("write nested");

        let mut entries = list_entries(dir.path())
            .expect("list")
            .collect::<Result<Vec<_>>>()
            .expect("entries");
        entries.sort();

        assert_eq!(
            entries,
            vec![dir.path().join("a.txt"), dir.path().join("sub")]
        );
        assert!(entries.iter().all(|path| path.is_absolute()));
    }

    #[test]
    fn missing_directory_is_a_list_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        match list_entries(&missing) {
            Err(Error::List { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected list error, got {other:?}"),
        }
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempdir().expect("tempdir");
        assert_eq!(list_entries(dir.path()).expect("list").count(), 0);
    }
}
