//! Source references and their local names
//!
//! A source reference is whatever the user passed to `forged build`,
//! usually a repository URL. Its local name is the directory the working
//! copy is staged under.

use std::fmt;

use crate::error::ForgeError;
use crate::infra::lock::LOCK_DIR;

/// Suffix stripped from the last path segment
const GIT_SUFFIX: &str = ".git";

/// A repository reference as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference(String);

impl SourceReference {
    /// Wrap a reference string
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference exactly as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the staging directory name
    ///
    /// Takes the last `/`-separated segment (ignoring trailing slashes) and
    /// strips one trailing `.git`. Fails if the result is not a safe single
    /// path component.
    pub fn local_name(&self) -> Result<String, ForgeError> {
        let name = derive_local_name(&self.0);
        validate_local_name(name).map_err(|()| ForgeError::InvalidTargetName {
            reference: self.0.clone(),
            name: name.to_string(),
        })?;
        Ok(name.to_string())
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceReference {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Last path segment with one trailing `.git` removed (unvalidated)
pub fn derive_local_name(reference: &str) -> &str {
    let trimmed = reference.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    segment.strip_suffix(GIT_SUFFIX).unwrap_or(segment)
}

/// Check that `name` is a single, non-traversing path component
pub fn is_safe_local_name(name: &str) -> bool {
    validate_local_name(name).is_ok()
}

/// Validate a name supplied directly (e.g. to `remove-build`)
pub fn check_local_name(name: &str) -> Result<(), ForgeError> {
    validate_local_name(name).map_err(|()| ForgeError::InvalidTargetName {
        reference: name.to_string(),
        name: name.to_string(),
    })
}

fn validate_local_name(name: &str) -> Result<(), ()> {
    if name.is_empty() || name == "." || name == ".." || name == LOCK_DIR {
        return Err(());
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
        return Err(());
    }
    Ok(())
}
