//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting [`FileRecord`]s for the cleanup rules.
//!
//! # Traversal policy
//!
//! - Symbolic links are never followed, and symlink entries are skipped
//!   (both symlinked directories and symlinked files)
//! - Only regular files are yielded; directories, sockets, devices and
//!   FIFOs are excluded
//! - Children are visited sorted by file name, so a given tree always
//!   yields the same order
//! - Errors are yielded as [`ScanError`] values rather than stopping
//!   iteration
//!
//! # Example
//!
//! ```no_run
//! use clean_files::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError};

/// Directory walker for file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// The iterator is lazy: metadata is read as entries are pulled.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        walk_dir.into_iter().filter_map(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping non-regular file: {}", entry.path().display());
                        return None;
                    }

                    match entry.metadata() {
                        Ok(metadata) => Some(Ok(FileRecord::from_metadata(
                            entry.into_path(),
                            self.root.clone(),
                            &metadata,
                        ))),
                        Err(e) => Some(Err(self.handle_walkdir_error(e))),
                    }
                }
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            }
        })
    }

    /// Walk the tree and split the results into records and errors.
    ///
    /// Errors are logged as they are collected.
    #[must_use]
    pub fn collect(&self) -> (Vec<FileRecord>, Vec<ScanError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for entry in self.walk() {
            match entry {
                Ok(file) => files.push(file),
                Err(e) => errors.push(e),
            }
        }
        log::debug!(
            "Walked {}: {} file(s), {} error(s)",
            self.root.display(),
            files.len(),
            errors.len()
        );
        (files, errors)
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                ScanError::Io { path, source }
            }
        }
    }
}
