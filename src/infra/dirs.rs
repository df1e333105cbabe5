//! Platform-specific directory management
//!
//! Provides the config directory and the default staging root.
//!
//! Environment variables can override default directories:
//! - `FORGED_CONFIG_DIR` - Override config directory
//! - `FORGED_ROOT` - Override the staging root

use std::env;
use std::path::PathBuf;

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "FORGED_CONFIG_DIR";
pub const ENV_STAGING_ROOT: &str = "FORGED_ROOT";

/// Application name used in directory paths
const APP_NAME: &str = "forged";

/// Staging root relative to the home directory
const STAGING_SUBDIR: [&str; 2] = ["forged", "git"];

/// Platform-specific directory provider for forged
#[derive(Debug, Clone)]
pub struct ForgedDirs {
    config_dir: PathBuf,
    home_dir: PathBuf,
}

impl ForgedDirs {
    /// Create a new `ForgedDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/forged` or `~/.config/forged`
    /// - macOS: `~/Library/Application Support/forged`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Staging root from `FORGED_ROOT`, if set and non-empty
    #[must_use]
    pub fn staging_root_override() -> Option<PathBuf> {
        env::var_os(ENV_STAGING_ROOT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// Default staging root: `~/forged/git`
    #[must_use]
    pub fn default_staging_root(&self) -> PathBuf {
        STAGING_SUBDIR
            .iter()
            .fold(self.home_dir.clone(), |path, part| path.join(part))
    }

    fn resolve_config_dir() -> PathBuf {
        if let Some(path) = env::var_os(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for ForgedDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_under_config_dir() {
        let dirs = ForgedDirs::new();
        assert!(dirs.config_path().starts_with(dirs.config_dir()));
        assert!(dirs.config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_default_staging_root_ends_with_forged_git() {
        let dirs = ForgedDirs::new();
        assert!(dirs.default_staging_root().ends_with("forged/git"));
    }
}
