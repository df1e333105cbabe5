//! CLI implementation for `forged list`

use anyhow::{Context, Result};

use crate::cli::output::{is_json, is_quiet, print_info};
use crate::core::config::ResolvedConfig;
use crate::core::orchestrator::BuildOrchestrator;
use crate::infra::filesystem::OsFilesystem;
use crate::infra::process::SystemRunner;

/// Execute the list command
pub fn execute(config: &ResolvedConfig) -> Result<()> {
    let orchestrator = BuildOrchestrator::new(
        SystemRunner,
        OsFilesystem,
        config.root.clone(),
        config.settings.clone(),
    );
    let staged = orchestrator.list().with_context(|| {
        format!(
            "Failed to list working copies in {}",
            config.root.display()
        )
    })?;

    if is_json() {
        let json_result = serde_json::json!({
            "root": config.root,
            "targets": staged.iter().map(|t| serde_json::json!({
                "name": t.name,
                "path": t.path,
                "build_system": t.system,
                "commit": t.commit,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
        return Ok(());
    }

    if is_quiet() {
        return Ok(());
    }

    if staged.is_empty() {
        print_info(&format!(
            "No working copies staged in {}",
            config.root.display()
        ));
        return Ok(());
    }

    let width = staged.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for target in &staged {
        let commit = target
            .commit
            .as_deref()
            .map(|c| c.get(..12).unwrap_or(c))
            .unwrap_or("-");
        println!(
            "{:<width$}  {:<12}  {commit}",
            target.name,
            target.system.name()
        );
    }
    Ok(())
}
