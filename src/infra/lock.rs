//! Per-target advisory locks
//!
//! A build or removal of `<root>/<name>` holds an exclusive, non-blocking
//! lock on `<root>/.locks/<name>.lock` for its whole duration. The lock is
//! released when the guard is dropped. Lock files are left in place.
//!
//! Lock files live in their own directory so no working copy name can
//! collide with one; [`LOCK_DIR`] is reserved and never a valid local name.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LockError;

/// Directory under the staging root holding the lock files
pub const LOCK_DIR: &str = ".locks";

/// Suffix appended to the target name to form the lock file name
pub const LOCK_SUFFIX: &str = ".lock";

/// Held lock on one staged target
#[derive(Debug)]
pub struct TargetLock {
    _file: File,
    lock_path: PathBuf,
}

impl TargetLock {
    /// Path of the lock file guarding `name` inside `root`
    pub fn path_for(root: &Path, name: &str) -> PathBuf {
        root.join(LOCK_DIR).join(format!("{name}{LOCK_SUFFIX}"))
    }

    /// Acquire the lock for `name`, failing immediately on contention
    ///
    /// Creates the lock directory under `root` when missing.
    pub fn acquire(root: &Path, name: &str) -> Result<Self, LockError> {
        let lock_path = Self::path_for(root, name);
        std::fs::create_dir_all(root.join(LOCK_DIR)).map_err(|e| LockError::Open {
            lock_path: lock_path.clone(),
            error: e.to_string(),
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::Open {
                lock_path: lock_path.clone(),
                error: e.to_string(),
            })?;

        if let Err(err) = try_lock_exclusive(&file) {
            if err.kind() == io::ErrorKind::WouldBlock {
                return Err(LockError::Contention {
                    name: name.to_string(),
                    lock_path,
                });
            }
            return Err(LockError::Failed {
                lock_path,
                error: err.to_string(),
            });
        }

        tracing::debug!("Acquired lock {}", lock_path.display());
        Ok(Self {
            _file: file,
            lock_path,
        })
    }

    /// Path of the held lock file
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
    use rustix::fs::{flock, FlockOperation};
    use std::os::unix::io::AsFd;

    flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
        .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> io::Result<()> {
    // No advisory locking off unix; the lock file still marks the target.
    Ok(())
}
