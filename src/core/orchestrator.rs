//! Build orchestration
//!
//! Drives each source reference through stage → clone → detect → recipe,
//! strictly one command at a time. All side effects go through the
//! [`ProcessRunner`] and [`Filesystem`] the orchestrator was built with.

use std::path::{Path, PathBuf};

use crate::core::build_system::BuildSystem;
use crate::core::recipe::{BuildSettings, BuildStep, Recipe};
use crate::core::source::{check_local_name, SourceReference};
use crate::error::ForgeError;
use crate::infra::filesystem::Filesystem;
use crate::infra::git;
use crate::infra::lock::LOCK_DIR;
use crate::infra::process::ProcessRunner;

/// What a failed target means for the rest of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Report the failure and go on with the next target
    #[default]
    Continue,
    /// Stop at the first failure; later targets are skipped
    FailFast,
}

/// Progress notifications emitted while building
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// A target is about to be processed
    TargetStarted {
        index: usize,
        total: usize,
        reference: &'a SourceReference,
    },
    /// The shallow clone is starting
    Cloning { name: &'a str, dest: &'a Path },
    /// The working copy was classified
    Detected { name: &'a str, system: BuildSystem },
    /// A recipe step is about to run
    StepStarted { name: &'a str, step: &'a BuildStep },
    /// A target finished, successfully or not
    TargetFinished { outcome: &'a TargetOutcome },
}

/// Final state of one target
#[derive(Debug)]
pub enum TargetStatus {
    /// Every step succeeded
    Built,
    /// The target failed with this error
    Failed(ForgeError),
    /// Not attempted because an earlier target failed under fail-fast
    Skipped,
}

/// Result of processing one source reference
#[derive(Debug)]
pub struct TargetOutcome {
    /// Reference as given
    pub reference: SourceReference,
    /// Local name, if it could be derived
    pub name: Option<String>,
    /// Working copy path, once staged
    pub path: Option<PathBuf>,
    /// Detected build system, once cloned
    pub system: Option<BuildSystem>,
    /// HEAD commit of the working copy, when readable
    pub commit: Option<String>,
    /// Final status
    pub status: TargetStatus,
}

impl TargetOutcome {
    fn new(reference: SourceReference) -> Self {
        Self {
            reference,
            name: None,
            path: None,
            system: None,
            commit: None,
            status: TargetStatus::Skipped,
        }
    }

    /// Whether the target was built successfully
    pub fn is_built(&self) -> bool {
        matches!(self.status, TargetStatus::Built)
    }

    /// The error, if the target failed
    pub fn error(&self) -> Option<&ForgeError> {
        match &self.status {
            TargetStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Outcomes of a batch, in the order the references were given
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-target outcomes
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchReport {
    /// Number of targets built
    pub fn built_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_built()).count()
    }

    /// Number of failed targets
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error().is_some()).count()
    }

    /// Number of skipped targets
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, TargetStatus::Skipped))
            .count()
    }

    /// Whether every target was built
    pub fn all_built(&self) -> bool {
        self.outcomes.iter().all(TargetOutcome::is_built)
    }

    /// `Ok` if every target was built, else a [`ForgeError::BatchFailed`]
    /// carrying the first failure's exit code
    pub fn to_result(&self) -> Result<(), ForgeError> {
        if self.all_built() {
            return Ok(());
        }
        let code = self
            .outcomes
            .iter()
            .find_map(TargetOutcome::error)
            .map(ForgeError::exit_code);
        Err(ForgeError::BatchFailed {
            failed: self.failed_count(),
            total: self.outcomes.len(),
            code,
        })
    }
}

/// A working copy present under the staging root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTarget {
    /// Directory name
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Detected build system
    pub system: BuildSystem,
    /// HEAD commit, when readable
    pub commit: Option<String>,
}

/// Builds source references inside one staging root
#[derive(Debug)]
pub struct BuildOrchestrator<R, F> {
    runner: R,
    fs: F,
    root: PathBuf,
    settings: BuildSettings,
    policy: BatchPolicy,
}

impl<R: ProcessRunner, F: Filesystem> BuildOrchestrator<R, F> {
    /// Create an orchestrator staging under `root`
    pub fn new(runner: R, fs: F, root: impl Into<PathBuf>, settings: BuildSettings) -> Self {
        Self {
            runner,
            fs,
            root: root.into(),
            settings,
            policy: BatchPolicy::default(),
        }
    }

    /// Set the batch policy
    #[must_use]
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The staging root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The process runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build every reference in order
    ///
    /// Never stops early under [`BatchPolicy::Continue`]; under
    /// [`BatchPolicy::FailFast`] the targets after the first failure are
    /// reported as skipped without being touched.
    pub fn build_all(
        &self,
        references: &[SourceReference],
        observer: &mut dyn FnMut(BuildEvent<'_>),
    ) -> BatchReport {
        let total = references.len();
        let mut report = BatchReport::default();
        let mut halted = false;

        for (index, reference) in references.iter().enumerate() {
            if halted {
                let outcome = TargetOutcome::new(reference.clone());
                observer(BuildEvent::TargetFinished { outcome: &outcome });
                report.outcomes.push(outcome);
                continue;
            }

            observer(BuildEvent::TargetStarted {
                index,
                total,
                reference,
            });
            let outcome = self.build_one(reference, observer);
            observer(BuildEvent::TargetFinished { outcome: &outcome });

            if outcome.error().is_some() && self.policy == BatchPolicy::FailFast {
                tracing::info!("Stopping batch after failure of '{reference}'");
                halted = true;
            }
            report.outcomes.push(outcome);
        }

        report
    }

    /// Build a single reference
    pub fn build_one(
        &self,
        reference: &SourceReference,
        observer: &mut dyn FnMut(BuildEvent<'_>),
    ) -> TargetOutcome {
        let mut outcome = TargetOutcome::new(reference.clone());
        let result = self.build_target(reference, &mut outcome, observer);
        outcome.status = match result {
            Ok(()) => {
                tracing::info!("Built '{reference}'");
                TargetStatus::Built
            }
            Err(e) => {
                tracing::warn!("Build of '{reference}' failed: {e}");
                TargetStatus::Failed(e)
            }
        };
        outcome
    }

    fn build_target(
        &self,
        reference: &SourceReference,
        outcome: &mut TargetOutcome,
        observer: &mut dyn FnMut(BuildEvent<'_>),
    ) -> Result<(), ForgeError> {
        let name = reference.local_name()?;
        outcome.name = Some(name.clone());

        self.fs.make_dirs(&self.root)?;
        let _guard = self.fs.lock(&self.root, &name)?;

        let dest = self.root.join(&name);
        if self.fs.entry_kind(&dest)?.is_some() {
            tracing::info!("Discarding previous working copy {}", dest.display());
        }
        // Unconditional: a dangling symlink reads as absent but still blocks the clone
        self.fs.remove_tree(&dest)?;
        outcome.path = Some(dest.clone());

        observer(BuildEvent::Cloning {
            name: &name,
            dest: &dest,
        });
        let clone = git::shallow_clone(reference.as_str(), &dest, &self.root);
        let status = self
            .runner
            .run(&clone)
            .map_err(|source| ForgeError::SpawnFailed {
                name: name.clone(),
                step: "git clone".to_string(),
                source,
            })?;
        if !status.success() {
            return Err(ForgeError::CloneFailed {
                reference: reference.to_string(),
                code: status.code,
            });
        }
        if !self.fs.is_dir(&dest)? {
            tracing::warn!("Clone reported success but {} is missing", dest.display());
            return Err(ForgeError::CloneFailed {
                reference: reference.to_string(),
                code: status.code,
            });
        }

        let system = BuildSystem::detect(&self.fs, &dest)?;
        outcome.system = Some(system);
        tracing::info!("Detected {system} in {}", dest.display());
        observer(BuildEvent::Detected {
            name: &name,
            system,
        });

        let recipe = Recipe::for_system(system, &dest, &self.settings);
        self.run_recipe(&name, &recipe, observer)?;

        outcome.commit = git::head_commit(&dest);
        Ok(())
    }

    fn run_recipe(
        &self,
        name: &str,
        recipe: &Recipe,
        observer: &mut dyn FnMut(BuildEvent<'_>),
    ) -> Result<(), ForgeError> {
        for step in &recipe.steps {
            observer(BuildEvent::StepStarted { name, step });
            tracing::info!("[{name}] {}: {}", step.label, step.invocation);

            let status = self
                .runner
                .run(&step.invocation)
                .map_err(|source| ForgeError::SpawnFailed {
                    name: name.to_string(),
                    step: step.label.to_string(),
                    source,
                })?;

            if status.success() {
                continue;
            }
            if !step.checked {
                tracing::info!(
                    "[{name}] {} exited with {:?}, treated as success",
                    step.label,
                    status.code
                );
                continue;
            }
            return Err(ForgeError::StepFailed {
                name: name.to_string(),
                step: step.label.to_string(),
                code: status.code,
            });
        }
        Ok(())
    }

    /// Delete the working copy `name`
    ///
    /// Fails with [`ForgeError::NothingToRemove`] and touches nothing if no
    /// such directory is staged.
    pub fn remove(&self, name: &str) -> Result<PathBuf, ForgeError> {
        check_local_name(name)?;

        let path = self.root.join(name);
        if !self.fs.is_dir(&path)? {
            return Err(ForgeError::NothingToRemove {
                name: name.to_string(),
            });
        }

        let _guard = self.fs.lock(&self.root, name)?;
        self.fs.remove_tree(&path)?;
        tracing::info!("Removed {}", path.display());
        Ok(path)
    }

    /// Working copies currently staged, sorted by name
    pub fn list(&self) -> Result<Vec<StagedTarget>, ForgeError> {
        if !self.fs.is_dir(&self.root)? {
            return Ok(Vec::new());
        }

        let mut staged = Vec::new();
        for name in self.fs.list_dirs(&self.root)? {
            if name == LOCK_DIR {
                continue;
            }
            let path = self.root.join(&name);
            let system = BuildSystem::detect(&self.fs, &path)?;
            let commit = git::head_commit(&path);
            staged.push(StagedTarget {
                name,
                path,
                system,
                commit,
            });
        }
        Ok(staged)
    }
}
