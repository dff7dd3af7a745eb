//! Directory walker
//!
//! Discovers every servable file below the root, pruning directories whose name matches
//! the exclusion pattern. Any I/O error during the walk is fatal.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use super::route::derive_route;
use crate::error::StartupError;
use crate::http::mime;

/// A file discovered at startup
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path on disk (root joined with `relative`)
    pub path: PathBuf,
    /// Path relative to the served root
    pub relative: PathBuf,
    pub route: String,
    pub content_type: Cow<'static, str>,
}

impl FileEntry {
    pub fn new(root: &Path, relative: PathBuf) -> Self {
        let content_type = relative
            .file_name()
            .map_or(Cow::Borrowed("application/octet-stream"), |name| {
                mime::get_content_type(&name.to_string_lossy())
            });
        Self {
            path: root.join(&relative),
            route: derive_route(&relative),
            relative,
            content_type,
        }
    }

    /// Base name, as used in log lines and attachment headers
    pub fn file_name(&self) -> Cow<'_, str> {
        self.relative
            .file_name()
            .map_or(Cow::Borrowed(""), OsStr::to_string_lossy)
    }
}

pub struct Walker {
    root: PathBuf,
    exclude: Regex,
}

impl Walker {
    /// Validate the root and compile the exclusion pattern.
    pub fn new(root: &Path, exclude: &str) -> Result<Self, StartupError> {
        let metadata = std::fs::metadata(root).map_err(|source| StartupError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(StartupError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            exclude: Regex::new(exclude)?,
        })
    }

    /// Whether a directory with this name is skipped, along with everything below it
    pub fn is_excluded(&self, dir_name: &OsStr) -> bool {
        self.exclude.is_match(&dir_name.to_string_lossy())
    }

    /// Files below the root, sorted by name within each directory.
    ///
    /// The root itself is never matched against the pattern, so serving `./.site` works.
    pub fn entries(&self) -> impl Iterator<Item = Result<FileEntry, StartupError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_type().is_dir() || !self.is_excluded(e.file_name())
            })
            .filter_map(|res| match res {
                Ok(entry) => self.file_entry(&entry).transpose(),
                Err(e) => Some(Err(e.into())),
            })
    }

    /// `None` for directories and anything else that is not a regular file
    fn file_entry(&self, entry: &DirEntry) -> Result<Option<FileEntry>, StartupError> {
        let file_type = entry.file_type();
        let is_file = if file_type.is_symlink() {
            // Links are served through their own path; a dangling link fails the walk
            std::fs::metadata(entry.path())
                .map_err(|source| StartupError::Stat {
                    path: entry.path().to_path_buf(),
                    source,
                })?
                .is_file()
        } else {
            file_type.is_file()
        };

        if !is_file {
            return Ok(None);
        }

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .map_or_else(|_| entry.path().to_path_buf(), Path::to_path_buf);
        Ok(Some(FileEntry::new(&self.root, relative)))
    }
}
