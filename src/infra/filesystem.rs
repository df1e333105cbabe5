//! Filesystem operations
//!
//! The [`Filesystem`] trait is the seam the orchestrator uses for every
//! directory it touches, so staging can be exercised against temporary
//! directories or a stub.

use std::io;
use std::path::Path;

use crate::error::FilesystemError;
use crate::infra::lock::TargetLock;

/// What a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory)
    File,
    /// Directory
    Dir,
}

/// Filesystem capability consumed by the orchestrator
pub trait Filesystem {
    /// Guard returned by [`Filesystem::lock`], released on drop
    type Guard;

    /// Kind of entry at `path`, or `None` if nothing exists there
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>, FilesystemError>;

    /// Remove a directory tree; absent paths are not an error
    fn remove_tree(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Create a directory and all parents; existing directories are not an error
    fn make_dirs(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Names of the subdirectories of `path`, sorted
    fn list_dirs(&self, path: &Path) -> Result<Vec<String>, FilesystemError>;

    /// Take the exclusive lock guarding `name` inside `root`
    fn lock(&self, root: &Path, name: &str) -> Result<Self::Guard, FilesystemError>;

    /// Whether `path` is an existing directory
    fn is_dir(&self, path: &Path) -> Result<bool, FilesystemError> {
        Ok(self.entry_kind(path)? == Some(EntryKind::Dir))
    }

    /// Whether `path` is an existing regular file
    fn is_file(&self, path: &Path) -> Result<bool, FilesystemError> {
        Ok(self.entry_kind(path)? == Some(EntryKind::File))
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    type Guard = TargetLock;

    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>, FilesystemError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FilesystemError::Metadata {
                path: path.to_path_buf(),
                error: e.to_string(),
            }),
        }
    }

    fn remove_tree(&self, path: &Path) -> Result<(), FilesystemError> {
        // symlink_metadata so a symlinked target is unlinked, never followed
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(FilesystemError::Metadata {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                })
            }
        };

        let result = if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        result.map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn make_dirs(&self, path: &Path) -> Result<(), FilesystemError> {
        std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn list_dirs(&self, path: &Path) -> Result<Vec<String>, FilesystemError> {
        let read_dir_error = |e: io::Error| FilesystemError::ReadDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(path).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            if entry.file_type().map_err(read_dir_error)?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn lock(&self, root: &Path, name: &str) -> Result<TargetLock, FilesystemError> {
        Ok(TargetLock::acquire(root, name)?)
    }
}
