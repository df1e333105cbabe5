//! Error types for forged
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when no more specific code is available
pub const GENERIC_FAILURE: i32 = 1;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to list directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to inspect a path
    #[error("Failed to inspect '{path}': {error}")]
    Metadata { path: PathBuf, error: String },

    /// Lock acquisition failed
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Advisory lock errors
#[derive(Error, Debug)]
pub enum LockError {
    /// Another process holds the lock
    #[error(
        "'{name}' is being built by another forged process.\n\
         If you're sure no forged process is running, remove the lock file:\n  {lock_path}"
    )]
    Contention { name: String, lock_path: PathBuf },

    /// Failed to open the lock file
    #[error("Failed to open lock file '{lock_path}': {error}")]
    Open { lock_path: PathBuf, error: String },

    /// Locking failed for a reason other than contention
    #[error("Failed to lock '{lock_path}': {error}")]
    Failed { lock_path: PathBuf, error: String },
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be started at all
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Waiting for the child failed
    #[error("Failed to wait for '{program}': {error}")]
    Wait { program: String, error: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// A value is out of its allowed range
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level forged error type
///
/// Every variant is terminal for the target it occurred on.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// The reference does not yield a safe directory name
    #[error("Invalid target name '{name}' derived from '{reference}'")]
    InvalidTargetName { reference: String, name: String },

    /// Shallow clone failed
    #[error("Fetch failed for '{reference}'{}", exit_suffix(*code))]
    CloneFailed { reference: String, code: Option<i32> },

    /// A recipe step exited non-zero
    #[error("Step '{step}' failed for '{name}'{}", exit_suffix(*code))]
    StepFailed {
        name: String,
        step: String,
        code: Option<i32>,
    },

    /// A recipe step could not be started
    #[error("Step '{step}' could not run for '{name}': {source}")]
    SpawnFailed {
        name: String,
        step: String,
        source: ProcessError,
    },

    /// Nothing staged under the given name
    #[error("Nothing to remove: no staged build named '{name}'")]
    NothingToRemove { name: String },

    /// One or more targets of a batch failed
    #[error("{failed} of {total} target(s) failed")]
    BatchFailed {
        failed: usize,
        total: usize,
        code: Option<i32>,
    },

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ForgeError {
    /// Exit code for the process when this error ends it
    ///
    /// Propagates the failing command's code where one exists.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            Self::CloneFailed { code, .. }
            | Self::StepFailed { code, .. }
            | Self::BatchFailed { code, .. } => *code,
            _ => None,
        };
        match code {
            Some(c) if c != 0 => c,
            _ => GENERIC_FAILURE,
        }
    }

    /// Short status label for per-target reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTargetName { .. } => "invalid-target-name",
            Self::CloneFailed { .. } => "clone-failed",
            Self::StepFailed { .. } => "step-failed",
            Self::SpawnFailed { .. } => "spawn-failed",
            Self::NothingToRemove { .. } => "nothing-to-remove",
            Self::BatchFailed { .. } => "batch-failed",
            Self::Filesystem(FilesystemError::Lock(LockError::Contention { .. })) => "locked",
            Self::Filesystem(_) => "filesystem",
            Self::Config(_) => "config",
        }
    }
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(c) => format!(" (exit code {c})"),
        None => " (terminated by signal)".to_string(),
    }
}
