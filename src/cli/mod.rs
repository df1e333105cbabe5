//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::core::config::{ForgedConfig, Overrides, ResolvedConfig};
use crate::infra::dirs::ForgedDirs;
use commands::Commands;

/// Placeholder vergen emits when git metadata is unavailable
const VERGEN_PLACEHOLDER: &str = "VERGEN_IDEMPOTENT_OUTPUT";

/// Version string including the commit forged was built from, when known
fn long_version() -> &'static str {
    let version = env!("CARGO_PKG_VERSION");
    match build_details(option_env!("VERGEN_GIT_SHA"), option_env!("VERGEN_BUILD_DATE")) {
        Some(details) => Box::leak(format!("{version} ({details})").into_boxed_str()),
        None => version,
    }
}

fn build_details(sha: Option<&str>, date: Option<&str>) -> Option<String> {
    let known = |value: &&str| !value.is_empty() && *value != VERGEN_PLACEHOLDER;
    let sha = sha.filter(known)?;
    Some(match date.filter(known) {
        Some(date) => format!("{sha}, built {date}"),
        None => sha.to_string(),
    })
}

/// Forged - build and install projects from source
///
/// Clones a repository, detects its build system (Meson, CMake, Make or
/// PKGBUILD) and runs the matching build and install commands.
#[derive(Parser, Debug)]
#[command(name = "forged")]
#[command(author, version, long_version = long_version(), about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Staging root for working copies [default: ~/forged/git]
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "FORGED_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let overrides = Overrides {
            root: self.root,
            ..command.overrides()
        };
        let config = load_config(self.config, &overrides)?;
        tracing::debug!("Staging root: {}", config.root.display());

        command.run(&config)
    }
}

/// Load the config file and apply environment and flag overrides
pub fn load_config(path: Option<PathBuf>, overrides: &Overrides) -> Result<ResolvedConfig> {
    let dirs = ForgedDirs::new();
    let file = match path {
        Some(path) => ForgedConfig::load_from_path(&path),
        None => ForgedConfig::load(&dirs),
    }
    .context("Failed to load configuration")?;

    let resolved = file
        .resolve(&dirs, ForgedDirs::staging_root_override(), overrides)
        .context("Invalid configuration")?;
    Ok(resolved)
}
