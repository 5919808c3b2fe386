//! Report artifacts - discovery and export of test run outputs
//!
//! Reports are located on disk after the test run and exported to the
//! deploy directory. Nothing in this module treats a missing report as an
//! error: discovery misses and per-artifact export failures are logged as
//! warnings so the step outcome keeps reflecting the test run itself.

pub mod exporter;
pub mod locator;
pub mod test_addon;

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use exporter::{ArtifactExporter, ExportFailure, ExportSummary, ExportedArtifact};
pub use locator::{ArtifactLocator, SearchAttempt, SearchMode};
pub use test_addon::{TestAddonExporter, OTHER_DIR_NAME};

/// Name of the Gradle build output directory inside each module
pub const BUILD_DIR_NAME: &str = "build";

/// A located report file or directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path to the artifact
    pub path: PathBuf,

    /// Display and export name
    pub name: String,
}

impl Artifact {
    /// Create an artifact named after the last path component
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self { path, name }
    }

    /// Create an artifact whose name is prefixed with its owning module
    ///
    /// `<root>/app/build/reports/tests` becomes `app-tests`. Artifacts of the
    /// root project keep the plain file name.
    pub fn with_module_name(path: impl Into<PathBuf>, root: &Path) -> Self {
        let path = path.into();
        let base = file_name(&path);
        let name = match module_name(&path, root) {
            Some(module) => format!("{}-{}", module, base),
            None => base,
        };
        Self { path, name }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Module owning a path below `root`: the components before `build`, joined with `-`
pub fn module_name(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let segments: Vec<String> = relative
        .components()
        .take_while(|c| c.as_os_str() != BUILD_DIR_NAME)
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    // No `build` component means the path is not a module output
    let has_build_dir = relative.components().any(|c| c.as_os_str() == BUILD_DIR_NAME);
    if !has_build_dir || segments.is_empty() {
        return None;
    }

    Some(segments.join("-"))
}
