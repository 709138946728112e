//! File effects: delete, rename, move and permission changes.
//!
//! # Overview
//!
//! Every effect either completes or leaves the filesystem as it found it:
//! - Rename and move never overwrite an existing destination. The
//!   destination is claimed with a hard link, which fails if anything
//!   already sits there, and only then is the source unlinked
//! - Move creates the destination directory first, so a failure there
//!   leaves the source untouched. Directories it created are removed
//!   again if the move fails
//! - A move that cannot link or rename falls back to copy-then-remove;
//!   the copy is discarded if any later step fails
//!
//! # Example
//!
//! ```no_run
//! use clean_files::actions::Effect;
//! use std::path::PathBuf;
//!
//! let effect = Effect::Move {
//!     from: PathBuf::from("/backup/a.txt"),
//!     to: PathBuf::from("/main/a.txt"),
//! };
//! match effect.apply() {
//!     Ok(()) => println!("done"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for file effects.
#[derive(Debug, Error)]
pub enum ActionError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting the effect.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The destination of a rename or move already exists.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The destination directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::DestinationExists(p)
            | Self::CreateDir { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// A state-changing operation on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Remove the file.
    Delete { path: PathBuf },
    /// Give the file a new name in the same directory.
    Rename { from: PathBuf, to: PathBuf },
    /// Relocate the file, creating intermediate directories.
    Move { from: PathBuf, to: PathBuf },
    /// Set the file's permission bits.
    Chmod { path: PathBuf, mode: u32 },
}

impl Effect {
    /// The file the effect operates on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Delete { path } | Self::Chmod { path, .. } => path,
            Self::Rename { from, .. } | Self::Move { from, .. } => from,
        }
    }

    /// Human-readable description of the effect.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Delete { path } => format!("delete {}", path.display()),
            Self::Rename { from, to } => {
                format!("rename {} to {}", from.display(), display_name(to))
            }
            Self::Move { from, to } => format!("move {} to {}", from.display(), to.display()),
            Self::Chmod { path, mode } => format!("chmod {:o} {}", mode, path.display()),
        }
    }

    /// Perform the effect.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`]; the filesystem is left unchanged.
    pub fn apply(&self) -> Result<(), ActionError> {
        match self {
            Self::Delete { path } => delete_file(path).map(|_| ()),
            Self::Rename { from, to } => rename_file(from, to),
            Self::Move { from, to } => move_file(from, to),
            Self::Chmod { path, mode } => change_permissions(path, *mode).map(|_| ()),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Permanently delete a single file.
///
/// Returns the size of the removed file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for any other failure
pub fn delete_file(path: &Path) -> Result<u64, ActionError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ActionError::from_io(path, e))?;
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Delete failed for {}: {}", path.display(), e);
        ActionError::from_io(path, e)
    })?;

    log::info!("Removed: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Rename a file without overwriting an existing destination.
///
/// # Errors
///
/// - `DestinationExists` if `to` already exists
/// - `NotFound` / `PermissionDenied` / `Io` from the rename itself
pub fn rename_file(from: &Path, to: &Path) -> Result<(), ActionError> {
    fs::symlink_metadata(from).map_err(|e| ActionError::from_io(from, e))?;
    ensure_vacant(to)?;

    if !link_then_unlink(from, to)? {
        // No link support: the vacancy check above is the only guard
        fs::rename(from, to).map_err(|e| ActionError::from_io(from, e))?;
    }

    log::info!("Renamed: {} -> {}", from.display(), display_name(to));
    Ok(())
}

/// Move a file, creating the destination's parent directories.
///
/// # Errors
///
/// - `DestinationExists` if `to` already exists
/// - `CreateDir` if the destination directory cannot be created
/// - `NotFound` / `PermissionDenied` / `Io` from the move itself
pub fn move_file(from: &Path, to: &Path) -> Result<(), ActionError> {
    fs::symlink_metadata(from).map_err(|e| ActionError::from_io(from, e))?;
    ensure_vacant(to)?;

    let created = create_parents(to)?;
    if let Err(e) = transfer(from, to) {
        remove_created(&created);
        return Err(e);
    }

    log::info!("Moved: {} -> {}", from.display(), to.display());
    Ok(())
}

fn transfer(from: &Path, to: &Path) -> Result<(), ActionError> {
    if link_then_unlink(from, to)? {
        return Ok(());
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
        ) =>
        {
            Err(ActionError::from_io(from, e))
        }
        Err(e) => {
            log::debug!(
                "Rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                e
            );
            copy_then_remove(from, to)
        }
    }
}

/// Claim `to` with a hard link to `from`, then remove `from`.
///
/// Returns `Ok(false)` without touching anything when the link cannot be
/// made for a reason other than an occupied destination, such as a
/// destination on another filesystem.
fn link_then_unlink(from: &Path, to: &Path) -> Result<bool, ActionError> {
    match fs::hard_link(from, to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(ActionError::DestinationExists(to.to_path_buf()));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ActionError::from_io(from, e));
        }
        Err(e) => {
            log::debug!(
                "Hard link {} -> {} failed ({})",
                from.display(),
                to.display(),
                e
            );
            return Ok(false);
        }
    }

    if let Err(e) = fs::remove_file(from) {
        discard_copy(to);
        return Err(ActionError::from_io(from, e));
    }
    Ok(true)
}

/// Create the parent directories of `to`.
///
/// Returns the directories that did not exist before, deepest first.
fn create_parents(to: &Path) -> Result<Vec<PathBuf>, ActionError> {
    let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };

    let missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && is_missing(dir))
        .map(Path::to_path_buf)
        .collect();

    if let Err(e) = fs::create_dir_all(parent) {
        remove_created(&missing);
        return Err(ActionError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        });
    }
    Ok(missing)
}

fn is_missing(path: &Path) -> bool {
    matches!(fs::symlink_metadata(path), Err(e) if e.kind() == io::ErrorKind::NotFound)
}

fn remove_created(dirs: &[PathBuf]) {
    for dir in dirs {
        match fs::remove_dir(dir) {
            Ok(()) => log::debug!("Removed directory {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                log::warn!("Failed to remove directory {}: {}", dir.display(), e);
                break;
            }
        }
    }
}

/// Set a file's permission bits.
///
/// Returns the previous permission bits.
///
/// # Errors
///
/// - `NotFound` / `PermissionDenied` / `Io` from reading or setting permissions
pub fn change_permissions(path: &Path, mode: u32) -> Result<u32, ActionError> {
    let metadata = fs::metadata(path).map_err(|e| ActionError::from_io(path, e))?;
    let previous = crate::scanner::permission_bits(&metadata);

    fs::set_permissions(path, permissions_for(metadata.permissions(), mode))
        .map_err(|e| ActionError::from_io(path, e))?;

    log::info!(
        "Changed permissions: {} ({:o} -> {:o})",
        path.display(),
        previous,
        mode
    );
    Ok(previous)
}

#[cfg(unix)]
fn permissions_for(_current: fs::Permissions, mode: u32) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(mode)
}

#[cfg(not(unix))]
fn permissions_for(mut current: fs::Permissions, mode: u32) -> fs::Permissions {
    current.set_readonly(mode & 0o200 == 0);
    current
}

fn ensure_vacant(to: &Path) -> Result<(), ActionError> {
    match fs::symlink_metadata(to) {
        Ok(_) => Err(ActionError::DestinationExists(to.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ActionError::from_io(to, e)),
    }
}

/// Copy `from` to a newly created `to`, then remove `from`.
///
/// If any step fails the partial copy is removed and `from` is kept.
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), ActionError> {
    let mut source = fs::File::open(from).map_err(|e| ActionError::from_io(from, e))?;
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ActionError::DestinationExists(to.to_path_buf()),
            _ => ActionError::from_io(to, e),
        })?;

    let copied = io::copy(&mut source, &mut target)
        .and_then(|_| target.sync_all())
        .and_then(|()| {
            let permissions = source.metadata()?.permissions();
            fs::set_permissions(to, permissions)
        });
    drop(target);

    if let Err(e) = copied {
        discard_copy(to);
        return Err(ActionError::from_io(to, e));
    }

    if let Err(e) = fs::remove_file(from) {
        discard_copy(to);
        return Err(ActionError::from_io(from, e));
    }
    Ok(())
}

fn discard_copy(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::error!("Failed to remove partial copy {}: {}", path.display(), e);
    }
}
