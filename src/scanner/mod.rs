//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Content hashing with BLAKE3
//! - Resolving the set of directories a run operates on
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//! - [`dirs`]: Main/extra directory resolution
//!
//! # Example
//!
//! ```no_run
//! use clean_files::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod dirs;
pub mod hasher;
pub mod walker;

use std::cell::OnceCell;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use dirs::{DirectorySet, PathError};
pub use hasher::{hash_to_hex, Hash, Hasher, HASH_BUFFER_SIZE};
pub use walker::Walker;

/// A discovered file and its derived attributes.
///
/// Size, modification time and permission bits come from the metadata
/// read during the walk. The content hash is computed on first use and
/// cached for the lifetime of the record.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// Root directory the file was discovered under
    pub root: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Permission bits (`mode & 0o7777` on Unix)
    pub permissions: u32,
    hash: OnceCell<Hash>,
}

impl FileRecord {
    /// Create a new FileRecord.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `root` - Root directory the file belongs to
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    /// * `permissions` - Permission bits
    #[must_use]
    pub fn new(
        path: PathBuf,
        root: PathBuf,
        size: u64,
        modified: SystemTime,
        permissions: u32,
    ) -> Self {
        Self {
            path,
            root,
            size,
            modified,
            permissions,
            hash: OnceCell::new(),
        }
    }

    /// Build a record from walk metadata.
    #[must_use]
    pub fn from_metadata(path: PathBuf, root: PathBuf, metadata: &Metadata) -> Self {
        Self::new(
            path,
            root,
            metadata.len(),
            metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            permission_bits(metadata),
        )
    }

    /// Base name of the file, byte for byte as the filesystem reports it.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// Path of the file relative to the root it was discovered under.
    ///
    /// Falls back to the bare file name if the path is not under `root`.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        match self.path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => PathBuf::from(self.path.file_name().unwrap_or_default()),
        }
    }

    /// Content hash of the file, computed once and cached.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be read. Failures are not
    /// cached, so a later call retries the read.
    pub fn content_hash(&self, hasher: &Hasher) -> Result<Hash, HashError> {
        if let Some(hash) = self.hash.get() {
            return Ok(*hash);
        }
        let hash = hasher.full_hash(&self.path)?;
        let _ = self.hash.set(hash);
        Ok(hash)
    }

    /// Whether the content hash has already been computed.
    #[must_use]
    pub fn is_hashed(&self) -> bool {
        self.hash.get().is_some()
    }
}

/// Extract permission bits from metadata.
#[cfg(unix)]
#[must_use]
pub fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

/// Extract permission bits from metadata.
///
/// Non-Unix platforms only expose a read-only flag, mapped to `0o444`/`0o644`.
#[cfg(not(unix))]
#[must_use]
pub fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing failed for a discovered file.
    #[error(transparent)]
    HashError(#[from] HashError),
}

impl ScanError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
            Self::HashError(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
