//! Git operations
//!
//! Cloning goes through the process runner like every other step, so the
//! user's git configuration and credential helpers apply. Reading the
//! checked-out commit uses the gix crate and needs no subprocess.

use std::path::Path;

use crate::infra::process::Invocation;

/// Program used for cloning
pub const GIT_PROGRAM: &str = "git";

/// Build the shallow-clone invocation for `reference` into `dest`
///
/// `--` keeps a reference starting with `-` from being read as an option.
pub fn shallow_clone(reference: &str, dest: &Path, cwd: &Path) -> Invocation {
    Invocation::new(GIT_PROGRAM, cwd)
        .args(["clone", "--depth=1", "--"])
        .arg(reference)
        .arg(dest.to_string_lossy())
}

/// Commit SHA checked out in the repository at `repo_path`
///
/// Returns `None` when the path is not a readable repository or HEAD is
/// unborn; callers treat the commit as optional information.
pub fn head_commit(repo_path: &Path) -> Option<String> {
    let repo = match gix::open(repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!("No git repository at {}: {e}", repo_path.display());
            return None;
        }
    };

    match repo.head_id() {
        Ok(id) => Some(id.detach().to_hex().to_string()),
        Err(e) => {
            tracing::warn!("Could not resolve HEAD in {}: {e}", repo_path.display());
            None
        }
    }
}
