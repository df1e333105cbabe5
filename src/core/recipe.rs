//! Build recipes
//!
//! A recipe is the ordered list of commands that builds and installs a
//! working copy of one [`BuildSystem`]. Recipes are plain data: rendering
//! one runs nothing.

use std::path::{Path, PathBuf};

use crate::core::build_system::BuildSystem;
use crate::infra::process::Invocation;

/// Out-of-source build directory used by Meson and CMake
pub const BUILD_SUBDIR: &str = "build";

/// What the interactive fallback's exit status means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackStatus {
    /// The fallback succeeds only if the shell exits 0
    #[default]
    ExitCode,
    /// The fallback always succeeds once the shell returns
    AlwaysSuccess,
}

/// Parameters recipes are rendered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Parallel jobs passed to make/cmake
    pub jobs: usize,
    /// Privilege elevation program for install steps; `None` runs them directly
    pub elevate: Option<String>,
    /// Install prefix for CMake projects
    pub install_prefix: String,
    /// Shell used when no build system is detected
    pub shell: String,
    /// How the shell fallback's exit status is judged
    pub fallback_status: FallbackStatus,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            jobs: num_cpus::get().max(1),
            elevate: Some("sudo".to_string()),
            install_prefix: "/usr".to_string(),
            shell: "bash".to_string(),
            fallback_status: FallbackStatus::ExitCode,
        }
    }
}

/// One step of a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    /// Short label used in status lines and errors
    pub label: &'static str,
    /// Command to run
    pub invocation: Invocation,
    /// Whether a non-zero exit fails the build
    pub checked: bool,
}

impl BuildStep {
    fn new(label: &'static str, invocation: Invocation) -> Self {
        Self {
            label,
            invocation,
            checked: true,
        }
    }
}

/// Ordered steps for one working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Build system the recipe was rendered for
    pub system: BuildSystem,
    /// Steps in execution order
    pub steps: Vec<BuildStep>,
}

impl Recipe {
    /// Render the recipe for `system` in the working copy at `root`
    pub fn for_system(system: BuildSystem, root: &Path, settings: &BuildSettings) -> Self {
        let steps = match system {
            BuildSystem::Meson => meson(root, settings),
            BuildSystem::CMake => cmake(root, settings),
            BuildSystem::Make => make(root, settings),
            BuildSystem::PackageScript => package_script(root),
            BuildSystem::Unclassified => shell_fallback(root, settings),
        };
        Self { system, steps }
    }

    /// Step labels in order
    pub fn labels(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.label).collect()
    }
}

/// Prefix `program` with the elevation command when one is configured
fn privileged(settings: &BuildSettings, program: &str, cwd: PathBuf) -> Invocation {
    match settings.elevate.as_deref() {
        Some(elevate) => Invocation::new(elevate, cwd).arg(program),
        None => Invocation::new(program, cwd),
    }
}

fn meson(root: &Path, settings: &BuildSettings) -> Vec<BuildStep> {
    let build_dir = root.join(BUILD_SUBDIR);
    vec![
        BuildStep::new(
            "meson setup",
            Invocation::new("meson", root).args(["setup", BUILD_SUBDIR]),
        ),
        BuildStep::new("ninja", Invocation::new("ninja", &build_dir)),
        BuildStep::new(
            "ninja install",
            privileged(settings, "ninja", build_dir).arg("install"),
        ),
    ]
}

fn cmake(root: &Path, settings: &BuildSettings) -> Vec<BuildStep> {
    vec![
        BuildStep::new(
            "cmake configure",
            Invocation::new("cmake", root)
                .arg(format!("-B{BUILD_SUBDIR}"))
                .arg(format!("-DCMAKE_INSTALL_PREFIX={}", settings.install_prefix)),
        ),
        BuildStep::new(
            "cmake build",
            Invocation::new("cmake", root)
                .args(["--build", BUILD_SUBDIR, "--parallel"])
                .arg(settings.jobs.to_string()),
        ),
        BuildStep::new(
            "cmake install",
            privileged(settings, "cmake", root.to_path_buf()).args(["--install", BUILD_SUBDIR]),
        ),
    ]
}

fn make(root: &Path, settings: &BuildSettings) -> Vec<BuildStep> {
    vec![
        BuildStep::new(
            "make",
            Invocation::new("make", root).arg(format!("-j{}", settings.jobs)),
        ),
        BuildStep::new(
            "make install",
            privileged(settings, "make", root.to_path_buf()).arg("install"),
        ),
    ]
}

fn package_script(root: &Path) -> Vec<BuildStep> {
    vec![BuildStep::new(
        "makepkg",
        Invocation::new("makepkg", root).args(["-si", "--noconfirm"]),
    )]
}

fn shell_fallback(root: &Path, settings: &BuildSettings) -> Vec<BuildStep> {
    vec![BuildStep {
        label: "shell",
        invocation: Invocation::new(settings.shell.as_str(), root),
        checked: settings.fallback_status == FallbackStatus::ExitCode,
    }]
}
