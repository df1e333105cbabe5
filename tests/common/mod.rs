//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a
//! temporary staging root and a process runner that plays back scripted
//! results instead of starting real programs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use forged::core::orchestrator::BuildOrchestrator;
use forged::core::recipe::BuildSettings;
use forged::error::ProcessError;
use forged::infra::filesystem::OsFilesystem;
use forged::infra::process::{ExitOutcome, Invocation, ProcessRunner};
use tempfile::TempDir;

/// Exit code git uses when a repository cannot be cloned
pub const GIT_CLONE_FAILURE: i32 = 128;

/// Temporary staging root, plus a separate config directory for binary runs
pub struct TestStaging {
    /// Temporary directory backing the root
    pub dir: TempDir,
    /// Config directory handed to the binary
    pub config_dir: TempDir,
}

impl TestStaging {
    /// Create an empty staging root
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the config file the binary will read
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write config");
    }

    /// Path of the staging root
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of a working copy
    pub fn target(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Stage a working copy by hand with the given files
    pub fn stage(&self, name: &str, files: &[&str]) {
        let dir = self.target(name);
        std::fs::create_dir_all(&dir).expect("Failed to create working copy");
        for file in files {
            std::fs::write(dir.join(file), "").expect("Failed to write file");
        }
    }

    /// Whether a path below the root exists
    pub fn exists(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }

    /// Sorted names of the entries directly under the root
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("Failed to read staging root")
            .map(|e| {
                e.expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

impl Default for TestStaging {
    fn default() -> Self {
        Self::new()
    }
}

/// What the scripted runner does for a command
#[derive(Debug, Clone, Copy)]
enum Scripted {
    Exit(i32),
    SpawnError,
}

/// Process runner that records invocations and plays back scripted results
///
/// `git clone` materializes the working copy from the files registered
/// with [`ScriptedRunner::repo`]; unknown references fail like git does.
/// Every other command exits 0 unless scripted otherwise.
#[derive(Default)]
pub struct ScriptedRunner {
    repos: HashMap<String, Vec<String>>,
    scripted: Vec<(String, Scripted)>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Create a runner that knows no repositories
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cloneable repository containing `files`
    pub fn repo(mut self, reference: &str, files: &[&str]) -> Self {
        self.repos.insert(
            reference.to_string(),
            files.iter().map(|f| (*f).to_string()).collect(),
        );
        self
    }

    /// Make commands whose rendered command line starts with `prefix` exit with `code`
    pub fn exit_with(mut self, prefix: &str, code: i32) -> Self {
        self.scripted.push((prefix.to_string(), Scripted::Exit(code)));
        self
    }

    /// Make commands whose rendered command line starts with `prefix` fail to start
    pub fn fail_to_spawn(mut self, prefix: &str) -> Self {
        self.scripted.push((prefix.to_string(), Scripted::SpawnError));
        self
    }

    /// Every invocation so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Rendered command lines so far, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    fn clone_repo(&self, invocation: &Invocation) -> ExitOutcome {
        // git clone --depth=1 -- <reference> <dest>
        let reference = &invocation.args[3];
        let dest = Path::new(&invocation.args[4]);
        let Some(files) = self.repos.get(reference) else {
            return ExitOutcome::code(GIT_CLONE_FAILURE);
        };
        std::fs::create_dir_all(dest).expect("Failed to create clone");
        for file in files {
            let path = dest.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent");
            }
            std::fs::write(path, "").expect("Failed to write file");
        }
        ExitOutcome::code(0)
    }
}

fn is_clone(invocation: &Invocation) -> bool {
    invocation.program == "git" && invocation.args.first().map(String::as_str) == Some("clone")
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, ProcessError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(invocation.clone());

        let line = invocation.to_string();
        let scripted = self
            .scripted
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, s)| *s);

        match scripted {
            Some(Scripted::SpawnError) => Err(ProcessError::Spawn {
                program: invocation.program.clone(),
                error: "No such file or directory (os error 2)".to_string(),
            }),
            Some(Scripted::Exit(code)) => Ok(ExitOutcome::code(code)),
            None if is_clone(invocation) => Ok(self.clone_repo(invocation)),
            None => Ok(ExitOutcome::code(0)),
        }
    }
}

/// Settings with fixed job count and elevation, independent of the host
pub fn test_settings() -> BuildSettings {
    BuildSettings {
        jobs: 4,
        elevate: Some("sudo".to_string()),
        install_prefix: "/usr".to_string(),
        shell: "bash".to_string(),
        ..BuildSettings::default()
    }
}

/// Orchestrator over the real filesystem with a scripted runner
pub fn orchestrator<'a>(
    runner: &'a ScriptedRunner,
    staging: &TestStaging,
) -> BuildOrchestrator<&'a ScriptedRunner, OsFilesystem> {
    BuildOrchestrator::new(runner, OsFilesystem, staging.root(), test_settings())
}

/// Run the forged binary against an isolated root and config directory
pub fn run_forged(staging: &TestStaging, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_forged"));
    cmd.env("FORGED_CONFIG_DIR", staging.config_dir.path())
        .env_remove("FORGED_ROOT")
        .env_remove("FORGED_CONFIG")
        .arg("--root")
        .arg(staging.root());
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute forged")
}
