//! Forged - build and install projects from source
//!
//! Entry point for the forged command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use forged::cli::output::{display_error, exit_code_for, OutputConfig};
use forged::cli::Cli;

/// Environment variable holding a tracing filter; `RUST_LOG` is used when unset
const LOG_ENV: &str = "FORGED_LOG";

fn init_tracing(output_config: OutputConfig) {
    let env_var = if std::env::var_os(LOG_ENV).is_some() {
        LOG_ENV
    } else {
        EnvFilter::DEFAULT_ENV
    };
    let filter = EnvFilter::builder()
        .with_default_directive(output_config.log_level().into())
        .with_env_var(env_var)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();
    init_tracing(output_config);

    // Run the command and handle errors
    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(exit_code_for(&e));
    }
}
