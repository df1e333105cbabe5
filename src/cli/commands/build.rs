//! CLI implementation for `forged build`
//!
//! Prints one status line per stage as the orchestrator reports progress,
//! then a summary of the batch.

use anyhow::Result;

use crate::cli::output::{
    is_json, is_quiet, print_detail, print_failure, print_info, print_success, print_warning,
};
use crate::core::build_system::BuildSystem;
use crate::core::config::ResolvedConfig;
use crate::core::orchestrator::{
    BatchPolicy, BatchReport, BuildEvent, BuildOrchestrator, TargetOutcome, TargetStatus,
};
use crate::core::source::SourceReference;
use crate::infra::filesystem::OsFilesystem;
use crate::infra::process::SystemRunner;

/// Execute the build command
pub fn execute(config: &ResolvedConfig, references: &[String]) -> Result<()> {
    let references: Vec<SourceReference> = references
        .iter()
        .map(|r| SourceReference::new(r.as_str()))
        .collect();
    let policy = if config.fail_fast {
        BatchPolicy::FailFast
    } else {
        BatchPolicy::Continue
    };

    let orchestrator = BuildOrchestrator::new(
        SystemRunner,
        OsFilesystem,
        config.root.clone(),
        config.settings.clone(),
    )
    .with_policy(policy);

    let shell = config.settings.shell.as_str();
    let report = orchestrator.build_all(&references, &mut |event| print_event(&event, shell));

    if is_json() {
        print_json(&report);
    } else {
        print_summary(&report);
    }

    report.to_result()?;
    Ok(())
}

fn print_event(event: &BuildEvent<'_>, shell: &str) {
    match event {
        BuildEvent::TargetStarted {
            index,
            total,
            reference,
        } => {
            if *total > 1 {
                print_info(&format!("[{}/{total}] Forging {reference}", index + 1));
            } else {
                print_info(&format!("Forging {reference}"));
            }
        }
        BuildEvent::Cloning { dest, .. } => {
            print_detail(&format!("Cloning into {}", dest.display()));
        }
        BuildEvent::Detected { name, system } => {
            if *system == BuildSystem::Unclassified {
                print_warning(&format!(
                    "No build system found in {name}, starting {shell} there"
                ));
            } else {
                print_detail(&format!("Detected {system}"));
            }
        }
        BuildEvent::StepStarted { step, .. } => {
            print_detail(&format!("→ {}", step.invocation));
        }
        BuildEvent::TargetFinished { outcome } => print_finished(outcome),
    }
}

fn print_finished(outcome: &TargetOutcome) {
    match &outcome.status {
        TargetStatus::Built => {
            let name = outcome.name.as_deref().unwrap_or(outcome.reference.as_str());
            match &outcome.commit {
                Some(commit) => print_success(&format!("Forged {name} at {}", short(commit))),
                None => print_success(&format!("Forged {name}")),
            }
        }
        TargetStatus::Failed(e) => print_failure(&e.to_string()),
        TargetStatus::Skipped => {
            print_warning(&format!("Skipped {} after earlier failure", outcome.reference));
        }
    }
}

fn print_summary(report: &BatchReport) {
    let total = report.outcomes.len();
    if total < 2 {
        return;
    }
    if !is_quiet() {
        println!();
    }
    let built = report.built_count();
    if report.all_built() {
        print_success(&format!("All {total} targets forged"));
        return;
    }
    let mut line = format!("{built}/{total} targets forged, {} failed", report.failed_count());
    let skipped = report.skipped_count();
    if skipped > 0 {
        line.push_str(&format!(", {skipped} skipped"));
    }
    print_warning(&line);
}

fn short(commit: &str) -> &str {
    commit.get(..12).unwrap_or(commit)
}

fn outcome_json(outcome: &TargetOutcome) -> serde_json::Value {
    let (status, error, kind) = match &outcome.status {
        TargetStatus::Built => ("built", None, None),
        TargetStatus::Failed(e) => ("failed", Some(e.to_string()), Some(e.kind())),
        TargetStatus::Skipped => ("skipped", None, None),
    };
    serde_json::json!({
        "reference": outcome.reference.as_str(),
        "name": outcome.name,
        "path": outcome.path,
        "build_system": outcome.system,
        "commit": outcome.commit,
        "status": status,
        "error": error,
        "error_kind": kind,
    })
}

fn print_json(report: &BatchReport) {
    let json_result = serde_json::json!({
        "status": if report.all_built() { "success" } else { "error" },
        "targets": report.outcomes.iter().map(outcome_json).collect::<Vec<_>>(),
        "built_count": report.built_count(),
        "failed_count": report.failed_count(),
        "skipped_count": report.skipped_count(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&json_result).unwrap_or_default()
    );
}
