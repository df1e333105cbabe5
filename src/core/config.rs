//! Configuration management
//!
//! Reads `config.toml` from the forged config directory and resolves the
//! effective settings. Precedence is command-line flag, then environment,
//! then config file, then built-in default.
//!
//! ```toml
//! root = "/home/me/forged/git"
//! jobs = 8
//! elevate = "doas"          # "" runs install steps without elevation
//! install_prefix = "/usr"
//! shell = "zsh"
//! fallback_status = "exit-code"   # or "always-success"
//! fail_fast = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::recipe::{BuildSettings, FallbackStatus};
use crate::error::ConfigError;
use crate::infra::dirs::ForgedDirs;

/// Fallback status as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackStatusSetting {
    /// Succeed iff the shell exits 0
    ExitCode,
    /// Always succeed once the shell returns
    AlwaysSuccess,
}

impl From<FallbackStatusSetting> for FallbackStatus {
    fn from(setting: FallbackStatusSetting) -> Self {
        match setting {
            FallbackStatusSetting::ExitCode => Self::ExitCode,
            FallbackStatusSetting::AlwaysSuccess => Self::AlwaysSuccess,
        }
    }
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgedConfig {
    /// Staging root for working copies
    pub root: Option<PathBuf>,

    /// Parallel build jobs
    pub jobs: Option<usize>,

    /// Elevation program for install steps
    pub elevate: Option<String>,

    /// Install prefix for CMake projects
    pub install_prefix: Option<String>,

    /// Shell for the interactive fallback
    pub shell: Option<String>,

    /// How the fallback shell's exit status is judged
    pub fallback_status: Option<FallbackStatusSetting>,

    /// Stop a batch at the first failed target
    pub fail_fast: Option<bool>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--root`
    pub root: Option<PathBuf>,
    /// `--jobs`
    pub jobs: Option<usize>,
    /// `--fail-fast`
    pub fail_fast: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Staging root
    pub root: PathBuf,
    /// Recipe parameters
    pub settings: BuildSettings,
    /// Batch stops at first failure
    pub fail_fast: bool,
}

impl ForgedConfig {
    /// Load from the default location
    pub fn load(dirs: &ForgedDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Combine with overrides and defaults
    ///
    /// `env_root` is the value of `FORGED_ROOT`, if any.
    pub fn resolve(
        &self,
        dirs: &ForgedDirs,
        env_root: Option<PathBuf>,
        overrides: &Overrides,
    ) -> Result<ResolvedConfig, ConfigError> {
        let defaults = BuildSettings::default();

        let jobs = overrides.jobs.or(self.jobs).unwrap_or(defaults.jobs);
        if jobs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let shell = self.shell.clone().unwrap_or(defaults.shell);
        if shell.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "shell".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let elevate = match &self.elevate {
            Some(program) if program.trim().is_empty() => None,
            Some(program) => Some(program.clone()),
            None => defaults.elevate,
        };

        let root = overrides
            .root
            .clone()
            .or(env_root)
            .or_else(|| self.root.clone())
            .unwrap_or_else(|| dirs.default_staging_root());

        Ok(ResolvedConfig {
            root,
            settings: BuildSettings {
                jobs,
                elevate,
                install_prefix: self
                    .install_prefix
                    .clone()
                    .unwrap_or(defaults.install_prefix),
                shell,
                fallback_status: self
                    .fallback_status
                    .map_or(defaults.fallback_status, Into::into),
            },
            fail_fast: overrides.fail_fast || self.fail_fast.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolve(config: &ForgedConfig, overrides: &Overrides) -> ResolvedConfig {
        config
            .resolve(&ForgedDirs::new(), None, overrides)
            .unwrap()
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = ForgedConfig::load_from_path(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, ForgedConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "jobs = [not valid").unwrap();

        match ForgedConfig::load_from_path(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected parse error, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ForgedConfig::from_toml("jbos = 4").is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let config = ForgedConfig::from_toml(
            r#"
root = "/srv/forged"
jobs = 3
elevate = "doas"
install_prefix = "/usr/local"
shell = "zsh"
fallback_status = "always-success"
fail_fast = true
"#,
        )
        .unwrap();

        let resolved = resolve(&config, &Overrides::default());
        assert_eq!(resolved.root, PathBuf::from("/srv/forged"));
        assert_eq!(resolved.settings.jobs, 3);
        assert_eq!(resolved.settings.elevate.as_deref(), Some("doas"));
        assert_eq!(resolved.settings.install_prefix, "/usr/local");
        assert_eq!(resolved.settings.shell, "zsh");
        assert_eq!(resolved.settings.fallback_status, FallbackStatus::AlwaysSuccess);
        assert!(resolved.fail_fast);
    }

    #[test]
    fn test_defaults() {
        let resolved = resolve(&ForgedConfig::default(), &Overrides::default());
        assert!(resolved.settings.jobs >= 1);
        assert_eq!(resolved.settings.elevate.as_deref(), Some("sudo"));
        assert_eq!(resolved.settings.install_prefix, "/usr");
        assert_eq!(resolved.settings.shell, "bash");
        assert_eq!(resolved.settings.fallback_status, FallbackStatus::ExitCode);
        assert!(!resolved.fail_fast);
        assert!(resolved.root.ends_with("forged/git"));
    }

    #[test]
    fn test_empty_elevate_disables_elevation() {
        let config = ForgedConfig {
            elevate: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(resolve(&config, &Overrides::default()).settings.elevate, None);
    }

    #[test]
    fn test_root_precedence() {
        let config = ForgedConfig {
            root: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        let dirs = ForgedDirs::new();

        let from_env = config
            .resolve(&dirs, Some(PathBuf::from("/from/env")), &Overrides::default())
            .unwrap();
        assert_eq!(from_env.root, PathBuf::from("/from/env"));

        let overrides = Overrides {
            root: Some(PathBuf::from("/from/flag")),
            ..Default::default()
        };
        let from_flag = config
            .resolve(&dirs, Some(PathBuf::from("/from/env")), &overrides)
            .unwrap();
        assert_eq!(from_flag.root, PathBuf::from("/from/flag"));

        let from_file = config.resolve(&dirs, None, &Overrides::default()).unwrap();
        assert_eq!(from_file.root, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_jobs_flag_overrides_file() {
        let config = ForgedConfig {
            jobs: Some(2),
            ..Default::default()
        };
        let overrides = Overrides {
            jobs: Some(16),
            ..Default::default()
        };
        assert_eq!(resolve(&config, &overrides).settings.jobs, 16);
    }

    #[test]
    fn test_zero_jobs_is_invalid() {
        let config = ForgedConfig {
            jobs: Some(0),
            ..Default::default()
        };
        let result = config.resolve(&ForgedDirs::new(), None, &Overrides::default());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
