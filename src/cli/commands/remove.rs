//! CLI implementation for `forged remove-build`
//!
//! Deletes one staged working copy. Nothing is touched when the name is
//! not staged.

use anyhow::Result;

use crate::cli::output::{is_json, print_success};
use crate::core::config::ResolvedConfig;
use crate::core::orchestrator::BuildOrchestrator;
use crate::infra::filesystem::OsFilesystem;
use crate::infra::process::SystemRunner;

/// Execute the remove-build command
pub fn execute(config: &ResolvedConfig, name: &str) -> Result<()> {
    let orchestrator = BuildOrchestrator::new(
        SystemRunner,
        OsFilesystem,
        config.root.clone(),
        config.settings.clone(),
    );
    let removed = orchestrator.remove(name)?;

    if is_json() {
        let json_result = serde_json::json!({
            "status": "success",
            "name": name,
            "removed": removed,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
        return Ok(());
    }

    print_success(&format!("Removed {name} ({})", removed.display()));
    Ok(())
}
