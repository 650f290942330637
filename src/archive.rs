//! The append-only zip archive that receives expired entries.
//!
//! New members are compressed with XZ (LZMA2, zip method 95).

use std::collections::HashSet;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use time::OffsetDateTime;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::config::ARCHIVE_FILE_NAME;
use crate::error::ArchiveError;
use crate::policy::EntryInfo;
use crate::{Error, Result};

const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// What a single [`ExpiredArchive::archive`] call wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedEntry {
    /// Top-level member name (directories without the trailing `/`).
    pub name: String,
    /// Number of members written, including directory members.
    pub members: u64,
    /// Source bytes read into the archive.
    pub bytes: u64,
}

/// Open handle on `expired_archive.zip` for the duration of one run.
pub struct ExpiredArchive {
    path: PathBuf,
    writer: ZipWriter<File>,
    /// Every member name without its trailing `/`, plus each of its parent
    /// directory prefixes.
    taken: HashSet<String>,
}

impl ExpiredArchive {
    /// Creates the archive in `dir`, or opens the existing one for appending.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(ARCHIVE_FILE_NAME);
        Self::open_at(&path).map_err(|source| Error::Write { path, source })
    }

    fn open_at(path: &Path) -> std::result::Result<Self, ArchiveError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut taken = HashSet::new();
        let writer = if file.metadata()?.len() == 0 {
            ZipWriter::new(file)
        } else {
            let existing = ZipArchive::new(&file)?;
            log::debug!(
                "opened archive {} with {} existing members",
                path.display(),
                existing.len()
            );
            for name in existing.file_names() {
                reserve(&mut taken, name);
            }
            drop(existing);
            ZipWriter::new_append(file)?
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            taken,
        })
    }

    /// Appends `entry` (a file, or a directory with everything under it).
    pub fn archive(&mut self, entry: &EntryInfo) -> Result<ArchivedEntry> {
        self.archive_path(&entry.path)
            .map_err(|source| Error::Write {
                path: entry.path.clone(),
                source,
            })
    }

    fn archive_path(&mut self, path: &Path) -> std::result::Result<ArchivedEntry, ArchiveError> {
        let metadata = fs::metadata(path)?;
        let name = self.unique_name(&member_name(path));
        let mut archived = ArchivedEntry {
            name: name.clone(),
            members: 0,
            bytes: 0,
        };

        if !metadata.is_dir() {
            archived.bytes += self.append_file(name, path, &metadata)?;
            archived.members += 1;
            return Ok(archived);
        }

        self.append_dir(name.clone(), &metadata)?;
        archived.members += 1;

        for child in WalkDir::new(path)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let child = child.map_err(io::Error::from)?;
            let relative = child.path().strip_prefix(path).map_err(io::Error::other)?;
            let child_name = format!("{name}/{}", join_components(relative));

            if child.file_type().is_dir() {
                self.append_dir(child_name, &child.metadata().map_err(io::Error::from)?)?;
            } else if child.file_type().is_file() {
                let child_meta = child.metadata().map_err(io::Error::from)?;
                archived.bytes += self.append_file(child_name, child.path(), &child_meta)?;
            } else {
                // symlink inside the tree: keep file targets, skip the rest
                match fs::metadata(child.path()) {
                    Ok(target) if target.is_file() => {
                        archived.bytes += self.append_file(child_name, child.path(), &target)?;
                    }
                    _ => {
                        log::debug!("skipping link {}", child.path().display());
                        continue;
                    }
                }
            }
            archived.members += 1;
        }

        Ok(archived)
    }

    fn append_file(
        &mut self,
        name: String,
        path: &Path,
        metadata: &Metadata,
    ) -> std::result::Result<u64, ArchiveError> {
        let options = member_options(metadata).large_file(metadata.len() >= ZIP64_THRESHOLD);
        let mut source = File::open(path)?;
        self.writer.start_file(name.clone(), options)?;
        let copied = io::copy(&mut source, &mut self.writer)?;
        reserve(&mut self.taken, &name);
        Ok(copied)
    }

    fn append_dir(&mut self, name: String, metadata: &Metadata) -> std::result::Result<(), ArchiveError> {
        let name = format!("{name}/");
        self.writer.add_directory(name.clone(), member_options(metadata))?;
        reserve(&mut self.taken, &name);
        Ok(())
    }

    /// First of `base`, `base.1`, `base.2`, ... not already used as a
    /// member or as a directory prefix.
    fn unique_name(&self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut suffix = 0u64;
        while self.taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        if suffix > 0 {
            log::info!("{base} already archived, storing as {candidate}");
        }
        candidate
    }

    /// Writes the central directory and flushes the file to disk.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        let file = self.writer.finish().map_err(|e| Error::Write {
            path: path.clone(),
            source: e.into(),
        })?;
        file.sync_all().map_err(|e| Error::Write {
            path,
            source: e.into(),
        })
    }
}

/// Marks `name` and all of its directory prefixes as used.
fn reserve(taken: &mut HashSet<String>, name: &str) {
    let name = name.trim_end_matches('/');
    for (idx, _) in name.match_indices('/') {
        taken.insert(name[..idx].to_string());
    }
    taken.insert(name.to_string());
}

/// Archive member name for an absolute path: root and drive stripped,
/// `/`-separated.
pub fn member_name(path: &Path) -> String {
    join_components(path)
}

fn join_components(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }
    parts.join("/")
}

fn member_options(metadata: &Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Xz)
        .last_modified_time(zip_time(metadata.modified().ok()));
    with_permissions(options, metadata)
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &Metadata) -> SimpleFileOptions {
    options
}

/// Zip timestamps are local-free DOS times starting at 1980; out of range
/// values fall back to the zip epoch.
fn zip_time(at: Option<SystemTime>) -> DateTime {
    let Some(at) = at else {
        return DateTime::default();
    };
    let at = OffsetDateTime::from(at);
    let Ok(year) = u16::try_from(at.year()) else {
        return DateTime::default();
    };
    DateTime::from_date_and_time(
        year,
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
    )
    .unwrap_or_default()
}
