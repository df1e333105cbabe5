//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod doctor;
pub mod list;
pub mod remove;

use anyhow::Result;
use clap::Subcommand;

use crate::core::config::{Overrides, ResolvedConfig};

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone, detect and build one or more repositories
    Build {
        /// Repository references (URLs or paths)
        #[arg(required = true, value_name = "REF")]
        references: Vec<String>,

        /// Number of parallel jobs [default: number of CPUs]
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Stop at the first failed target instead of continuing
        #[arg(long)]
        fail_fast: bool,
    },

    /// Delete a staged working copy
    RemoveBuild {
        /// Name of the working copy (as shown by `forged list`)
        name: String,
    },

    /// List staged working copies
    List,

    /// Check for the external tools the build recipes use
    Doctor,
}

impl Commands {
    /// Flag values that feed configuration resolution
    pub fn overrides(&self) -> Overrides {
        match self {
            Self::Build {
                jobs, fail_fast, ..
            } => Overrides {
                jobs: *jobs,
                fail_fast: *fail_fast,
                ..Overrides::default()
            },
            _ => Overrides::default(),
        }
    }

    /// Execute the command
    pub fn run(self, config: &ResolvedConfig) -> Result<()> {
        match self {
            Self::Build { references, .. } => build::execute(config, &references),
            Self::RemoveBuild { name } => remove::execute(config, &name),
            Self::List => list::execute(config),
            Self::Doctor => doctor::execute(config),
        }
    }
}
