//! Integration tests for `forged list`

mod common;

use common::{orchestrator, run_forged, ScriptedRunner, TestStaging};
use forged::core::build_system::BuildSystem;
use forged::core::orchestrator::BuildOrchestrator;
use forged::infra::filesystem::OsFilesystem;

#[test]
fn test_list_reports_staged_copies_sorted() {
    let staging = TestStaging::new();
    staging.stage("zeta", &["PKGBUILD"]);
    staging.stage("alpha", &["CMakeLists.txt"]);
    staging.stage("mid", &[]);
    let runner = ScriptedRunner::new();

    let staged = orchestrator(&runner, &staging).list().unwrap();

    let summary: Vec<(&str, BuildSystem)> =
        staged.iter().map(|t| (t.name.as_str(), t.system)).collect();
    assert_eq!(
        summary,
        vec![
            ("alpha", BuildSystem::CMake),
            ("mid", BuildSystem::Unclassified),
            ("zeta", BuildSystem::PackageScript),
        ]
    );
    // Hand-staged copies are not git repositories
    assert!(staged.iter().all(|t| t.commit.is_none()));
}

#[test]
fn test_list_ignores_lock_files() {
    let staging = TestStaging::new();
    let runner = ScriptedRunner::new().repo("https://example.com/foo.git", &["Makefile"]);
    let orchestrator = orchestrator(&runner, &staging);

    orchestrator.build_one(
        &forged::core::source::SourceReference::new("https://example.com/foo.git"),
        &mut |_| {},
    );
    let staged = orchestrator.list().unwrap();

    assert!(staging.exists(".locks/foo.lock"));
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].name, "foo");
}

#[test]
fn test_list_missing_root_is_empty() {
    let staging = TestStaging::new();
    let runner = ScriptedRunner::new();
    let orchestrator = BuildOrchestrator::new(
        &runner,
        OsFilesystem,
        staging.target("not-created-yet"),
        common::test_settings(),
    );

    assert!(orchestrator.list().unwrap().is_empty());
    assert!(!staging.exists("not-created-yet"));
}

#[test]
fn test_binary_list_json() {
    let staging = TestStaging::new();
    staging.stage("foo", &["meson.build"]);

    let output = run_forged(&staging, &["--json", "list"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["targets"][0]["name"], "foo");
    assert_eq!(json["targets"][0]["build_system"], "meson");
}

#[test]
fn test_binary_list_empty_root() {
    let staging = TestStaging::new();

    let output = run_forged(&staging, &["list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No working copies"), "stdout: {stdout}");
}
