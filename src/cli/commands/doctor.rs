//! CLI command for `forged doctor`
//!
//! Checks that the programs recipes invoke are installed.

use anyhow::Result;

use crate::cli::output::{is_json, is_quiet, print_info, print_success, print_warning, status};
use crate::core::build_system::BuildSystem;
use crate::core::config::ResolvedConfig;
use crate::core::doctor::run_doctor;

/// Execute the doctor command
pub fn execute(config: &ResolvedConfig) -> Result<()> {
    let settings = &config.settings;
    let report = run_doctor(settings);
    let missing = report.missing_required();

    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_required_found() { "success" } else { "error" },
            "tools": report.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "found": c.found,
                "required": c.required,
            })).collect::<Vec<_>>(),
            "build_systems": BuildSystem::ALL.iter().map(|s| serde_json::json!({
                "name": s,
                "supported": report.supports(*s, settings),
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
    } else if is_quiet() {
        for check in &missing {
            eprintln!("{} Missing required: {}", status::ERROR, check.name);
        }
    } else {
        print_info("Checking external tools...");
        println!();
        for check in &report.checks {
            let symbol = if check.found {
                status::SUCCESS
            } else if check.required {
                status::ERROR
            } else {
                status::WARNING
            };
            let required_str = if check.required { "" } else { " [optional]" };
            println!("  {symbol} {}{required_str}", check.name);
        }

        println!();
        for system in BuildSystem::ALL {
            if !report.supports(system, settings) {
                print_warning(&format!("{system} projects cannot be built here"));
            }
        }
        if report.all_required_found() {
            print_success("Ready to forge");
        }
    }

    if let Some(first) = missing.first() {
        anyhow::bail!("Missing required tool: {}", first.name);
    }
    Ok(())
}
