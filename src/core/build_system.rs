//! Build system detection
//!
//! Classification looks only at marker files in the root of a working copy
//! and takes the first match in a fixed precedence order.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::FilesystemError;
use crate::infra::filesystem::Filesystem;

/// Supported build systems, in detection precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildSystem {
    /// `meson.build`
    Meson,
    /// `CMakeLists.txt`
    #[serde(rename = "cmake")]
    CMake,
    /// `Makefile` or `makefile`
    Make,
    /// `PKGBUILD`, built with makepkg
    PackageScript,
    /// No marker found; falls back to an interactive shell
    Unclassified,
}

impl BuildSystem {
    /// Every variant, in detection order
    pub const ALL: [BuildSystem; 5] = [
        Self::Meson,
        Self::CMake,
        Self::Make,
        Self::PackageScript,
        Self::Unclassified,
    ];

    /// Marker files identifying this build system (any one suffices)
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Self::Meson => &["meson.build"],
            Self::CMake => &["CMakeLists.txt"],
            Self::Make => &["Makefile", "makefile"],
            Self::PackageScript => &["PKGBUILD"],
            Self::Unclassified => &[],
        }
    }

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Meson => "meson",
            Self::CMake => "cmake",
            Self::Make => "make",
            Self::PackageScript => "package-script",
            Self::Unclassified => "unclassified",
        }
    }

    /// Classify the working copy at `dir`
    ///
    /// Markers must be regular files; a directory named `Makefile` does not
    /// count.
    pub fn detect<F: Filesystem>(fs: &F, dir: &Path) -> Result<Self, FilesystemError> {
        for system in Self::ALL {
            for marker in system.markers() {
                if fs.is_file(&dir.join(marker))? {
                    tracing::debug!("Found {marker}, using {system}");
                    return Ok(system);
                }
            }
        }
        tracing::debug!("No build system marker in {}", dir.display());
        Ok(Self::Unclassified)
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
