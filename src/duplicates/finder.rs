//! Duplicate and missing-file detection.
//!
//! # Overview
//!
//! - [`find_same_content`]: groups records by BLAKE3 content hash
//! - [`find_same_name`]: groups records by base name
//! - [`find_missing`]: flags files outside the main directory whose content
//!   does not appear anywhere under it
//!
//! Every function finishes all hashing before returning, so callers can
//! apply effects without changing the file set mid-scan.
//!
//! # Example
//!
//! ```no_run
//! use clean_files::duplicates::find_missing;
//! use clean_files::scanner::{DirectorySet, Hasher};
//! use std::path::{Path, PathBuf};
//!
//! let dirs = DirectorySet::resolve(Path::new("/photos"), &[PathBuf::from("/backup")]).unwrap();
//! let scan = find_missing(&dirs, &Hasher::new());
//! for entry in &scan.entries {
//!     println!("{} -> {}", entry.file.path.display(), entry.destination.display());
//! }
//! ```

use std::collections::HashSet;
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::groups::{group_by_key, Grouping};
use crate::scanner::{DirectorySet, FileRecord, Hash, HashError, Hasher, ScanError, Walker};

/// A file absent from the main directory and where it would be moved.
#[derive(Debug, Clone)]
pub struct MissingEntry {
    /// The file outside the main directory
    pub file: FileRecord,
    /// Its path rewritten under the main directory
    pub destination: PathBuf,
}

/// Result of [`find_missing`].
#[derive(Debug, Default)]
pub struct MissingScan {
    /// Files whose content is absent from the main directory
    pub entries: Vec<MissingEntry>,
    /// Number of distinct content hashes under the main directory
    pub main_hashes: usize,
    /// Number of files checked outside the main directory
    pub checked: usize,
    /// Walk and hash failures; the affected files were skipped
    pub failures: Vec<ScanError>,
}

/// Group records by content hash.
pub fn find_same_content(
    files: impl IntoIterator<Item = FileRecord>,
    hasher: &Hasher,
) -> Grouping<Hash, HashError> {
    group_by_key(files, |file| file.content_hash(hasher))
}

/// Group records by base file name.
///
/// Names are compared as raw bytes, so names that differ only in bytes
/// that are not valid UTF-8 stay apart.
pub fn find_same_name(
    files: impl IntoIterator<Item = FileRecord>,
) -> Grouping<OsString, Infallible> {
    group_by_key(files, |file| Ok(file.file_name().to_os_string()))
}

/// Compute where a file from another root lands under `main`.
///
/// The file's path relative to its own root is re-attached to `main`, so a
/// directory name recurring deeper in the path is never rewritten.
#[must_use]
pub fn relocate(file: &FileRecord, main: &Path) -> PathBuf {
    main.join(file.relative_path())
}

/// Find files under the extra directories whose content is not present
/// anywhere under the main directory.
///
/// The main directory's hash set is built completely before any other
/// directory is examined.
#[must_use]
pub fn find_missing(dirs: &DirectorySet, hasher: &Hasher) -> MissingScan {
    let mut scan = MissingScan::default();
    let mut main_hashes: HashSet<Hash> = HashSet::new();

    for entry in Walker::new(dirs.main()).walk() {
        match entry.and_then(|file| file.content_hash(hasher).map_err(ScanError::from)) {
            Ok(hash) => {
                main_hashes.insert(hash);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", e.path().display(), e);
                scan.failures.push(e);
            }
        }
    }
    scan.main_hashes = main_hashes.len();
    log::debug!(
        "Main directory {}: {} distinct content hash(es)",
        dirs.main().display(),
        scan.main_hashes
    );

    for dir in dirs.others() {
        for entry in Walker::new(dir).walk() {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    scan.failures.push(e);
                    continue;
                }
            };
            scan.checked += 1;
            match file.content_hash(hasher) {
                Ok(hash) if main_hashes.contains(&hash) => {
                    log::trace!("Present in main directory: {}", file.path.display());
                }
                Ok(_) => {
                    let destination = relocate(&file, dirs.main());
                    log::debug!(
                        "Missing from main directory: {} -> {}",
                        file.path.display(),
                        destination.display()
                    );
                    scan.entries.push(MissingEntry { file, destination });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", file.path.display(), e);
                    scan.failures.push(e.into());
                }
            }
        }
    }

    log::info!(
        "Missing scan: {} file(s) checked, {} missing from {}",
        scan.checked,
        scan.entries.len(),
        dirs.main().display()
    );

    scan
}
