//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing BLAKE3 hashes
//! of file contents. Files are read in fixed-size chunks so memory use stays
//! bounded regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use clean_files::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("some_file.bin")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// BLAKE3 digest (32 bytes).
pub type Hash = [u8; 32];

/// Read buffer size used while hashing (64 KiB).
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: HASH_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file doesn't exist
    /// - `PermissionDenied` if the file can't be opened or read
    /// - `Io` for any other read failure
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let hash = self
            .hash_reader(file)
            .map_err(|e| map_io_error(path, e))?;
        log::trace!("Hashed {}: {}", path.display(), hash_to_hex(&hash));
        Ok(hash)
    }

    /// Hash everything produced by a reader.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Hash> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
        }
        Ok(*hasher.finalize().as_bytes())
    }
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

/// Format a hash as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
