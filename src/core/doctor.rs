//! Doctor command logic
//!
//! Checks that the external tools recipes invoke are on PATH and reports
//! which build systems can be handled on this machine.

use crate::core::build_system::BuildSystem;
use crate::core::recipe::BuildSettings;
use crate::infra::git::GIT_PROGRAM;

/// Result of a single tool check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    /// Program name
    pub name: String,
    /// Whether it was found
    pub found: bool,
    /// Whether forged cannot work at all without it
    pub required: bool,
}

/// Overall doctor report
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual tool checks
    pub checks: Vec<ToolCheck>,
}

impl DoctorReport {
    /// Whether every required tool was found
    pub fn all_required_found(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.found)
    }

    /// Required tools that are missing
    pub fn missing_required(&self) -> Vec<&ToolCheck> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.found)
            .collect()
    }

    fn found(&self, name: &str) -> bool {
        self.checks.iter().any(|c| c.name == name && c.found)
    }

    /// Whether every tool `system`'s recipe needs was found
    pub fn supports(&self, system: BuildSystem, settings: &BuildSettings) -> bool {
        tools_for(system, settings).iter().all(|tool| self.found(tool))
    }
}

/// Programs the recipe for `system` invokes
pub fn tools_for(system: BuildSystem, settings: &BuildSettings) -> Vec<String> {
    let mut tools: Vec<String> = match system {
        BuildSystem::Meson => vec!["meson".into(), "ninja".into()],
        BuildSystem::CMake => vec!["cmake".into()],
        BuildSystem::Make => vec!["make".into()],
        BuildSystem::PackageScript => vec!["makepkg".into()],
        BuildSystem::Unclassified => vec![settings.shell.clone()],
    };
    let has_install_step = !matches!(
        system,
        BuildSystem::PackageScript | BuildSystem::Unclassified
    );
    if has_install_step {
        tools.extend(settings.elevate.iter().cloned());
    }
    tools
}

/// Check every tool using `is_available` for the lookup
pub fn run_doctor_with(
    settings: &BuildSettings,
    is_available: impl Fn(&str) -> bool,
) -> DoctorReport {
    let mut report = DoctorReport::default();
    let mut seen: Vec<String> = Vec::new();

    let mut check = |name: String, required: bool, report: &mut DoctorReport| {
        if seen.contains(&name) {
            return;
        }
        let found = is_available(&name);
        tracing::debug!("Tool {name}: {}", if found { "found" } else { "missing" });
        report.checks.push(ToolCheck {
            name: name.clone(),
            found,
            required,
        });
        seen.push(name);
    };

    check(GIT_PROGRAM.to_string(), true, &mut report);
    for system in BuildSystem::ALL {
        for tool in tools_for(system, settings) {
            check(tool, false, &mut report);
        }
    }
    report
}

/// Check every tool against PATH
pub fn run_doctor(settings: &BuildSettings) -> DoctorReport {
    run_doctor_with(settings, crate::infra::process::is_available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_is_the_only_required_tool() {
        let report = run_doctor_with(&BuildSettings::default(), |_| true);
        let required: Vec<_> = report
            .checks
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(required, vec!["git"]);
    }

    #[test]
    fn test_tools_are_checked_once() {
        let report = run_doctor_with(&BuildSettings::default(), |_| true);
        let sudo_checks = report.checks.iter().filter(|c| c.name == "sudo").count();
        assert_eq!(sudo_checks, 1);
    }

    #[test]
    fn test_missing_git_fails_required() {
        let report = run_doctor_with(&BuildSettings::default(), |tool| tool != "git");
        assert!(!report.all_required_found());
        assert_eq!(report.missing_required()[0].name, "git");
    }

    #[test]
    fn test_supports_reflects_missing_tools() {
        let settings = BuildSettings::default();
        let report = run_doctor_with(&settings, |tool| tool != "ninja");
        assert!(!report.supports(BuildSystem::Meson, &settings));
        assert!(report.supports(BuildSystem::CMake, &settings));
        assert!(report.all_required_found());
    }

    #[test]
    fn test_no_elevation_drops_sudo() {
        let settings = BuildSettings {
            elevate: None,
            ..BuildSettings::default()
        };
        assert_eq!(tools_for(BuildSystem::Make, &settings), vec!["make".to_string()]);
        let report = run_doctor_with(&settings, |_| true);
        assert!(report.checks.iter().all(|c| c.name != "sudo"));
    }
}
