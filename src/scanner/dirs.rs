//! Resolution of the directories a run operates on.
//!
//! The main directory is mandatory and must be an existing directory.
//! Extra directories that are missing are dropped with a warning, and any
//! directory equal to or nested inside another root is dropped so that no
//! file is visited twice.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{FileRecord, ScanError, Walker};

/// Errors for configured directories.
#[derive(Debug, Error)]
pub enum PathError {
    /// The directory does not exist.
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The directory could not be resolved to an absolute path.
    #[error("Cannot resolve {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The main directory plus any extra directories, canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySet {
    main: PathBuf,
    others: Vec<PathBuf>,
}

impl DirectorySet {
    /// Resolve the directory set.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if the main directory is missing, is not a
    /// directory, or cannot be canonicalized.
    pub fn resolve(main: &Path, others: &[PathBuf]) -> Result<Self, PathError> {
        let main = canonical_dir(main)?;

        let mut resolved: Vec<PathBuf> = Vec::with_capacity(others.len());
        for dir in others {
            let dir = match canonical_dir(dir) {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("Ignoring directory: {}", e);
                    continue;
                }
            };

            if dir.starts_with(&main) {
                log::warn!(
                    "Ignoring {}: inside main directory {}",
                    dir.display(),
                    main.display()
                );
                continue;
            }
            if main.starts_with(&dir) {
                log::warn!(
                    "Ignoring {}: contains main directory {}",
                    dir.display(),
                    main.display()
                );
                continue;
            }
            if let Some(parent) = resolved.iter().find(|r| dir.starts_with(r)) {
                log::warn!(
                    "Ignoring {}: already covered by {}",
                    dir.display(),
                    parent.display()
                );
                continue;
            }

            // A new parent replaces any previously accepted children
            resolved.retain(|r| {
                let nested = r.starts_with(&dir);
                if nested {
                    log::warn!("Ignoring {}: covered by {}", r.display(), dir.display());
                }
                !nested
            });
            resolved.push(dir);
        }

        Ok(Self {
            main,
            others: resolved,
        })
    }

    /// The main directory.
    #[must_use]
    pub fn main(&self) -> &Path {
        &self.main
    }

    /// The extra directories.
    #[must_use]
    pub fn others(&self) -> &[PathBuf] {
        &self.others
    }

    /// Main directory followed by the extra directories.
    pub fn all(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.main.as_path()).chain(self.others.iter().map(PathBuf::as_path))
    }

    /// Walk every directory in the set, in order.
    ///
    /// Walk errors are logged and returned separately.
    #[must_use]
    pub fn collect_files(&self) -> (Vec<FileRecord>, Vec<ScanError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for dir in self.all() {
            let (mut found, mut failed) = Walker::new(dir).collect();
            files.append(&mut found);
            errors.append(&mut failed);
        }
        (files, errors)
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, PathError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PathError::NotFound(path.to_path_buf()),
        _ => PathError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    path.canonicalize().map_err(|e| PathError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
