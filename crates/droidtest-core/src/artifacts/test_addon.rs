//! Export of JUnit XML results into a test-results sink
//!
//! Each result file lands in a category directory named after the module and
//! variant that produced it, with a `test-info.json` naming the category:
//!
//! ```text
//! <sink>/app-demoDebug/TEST-com.example.AppTest.xml
//! <sink>/app-demoDebug/test-info.json
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::exporter::{ExportFailure, ExportSummary, ExportedArtifact};
use super::BUILD_DIR_NAME;

/// Category for results whose origin cannot be determined
pub const OTHER_DIR_NAME: &str = "other";

/// Directory Gradle writes JUnit XML results into
pub const TEST_RESULTS_DIR_NAME: &str = "test-results";

/// Metadata file written next to exported results
pub const TEST_INFO_FILE_NAME: &str = "test-info.json";

#[derive(Debug, Serialize)]
struct TestInfo<'a> {
    #[serde(rename = "test-name")]
    test_name: &'a str,
}

/// Copies result files into per-category directories of a sink
#[derive(Debug)]
pub struct TestAddonExporter {
    output_dir: PathBuf,
    root: Option<PathBuf>,
    other_dirs: usize,
}

impl TestAddonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            root: None,
            other_dirs: 0,
        }
    }

    /// Project root that result paths are categorized relative to
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Export every result file, continuing past failures
    pub fn export_all<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) -> ExportSummary {
        let mut summary = ExportSummary::default();

        for path in paths {
            match self.export(path) {
                Ok(destination) => summary.exported.push(ExportedArtifact {
                    source: path.to_path_buf(),
                    destination,
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to export test results for test addon");
                    summary.failed.push(ExportFailure {
                        source: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// Export one result file, returning where it was copied to
    pub fn export(&mut self, path: &Path) -> std::io::Result<PathBuf> {
        let dir = self.next_dir(path);
        let target_dir = self.output_dir.join(&dir);
        std::fs::create_dir_all(&target_dir)?;

        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;
        let destination = target_dir.join(file_name);
        std::fs::copy(path, &destination)?;

        let info = serde_json::to_vec(&TestInfo { test_name: &dir })?;
        std::fs::write(target_dir.join(TEST_INFO_FILE_NAME), info)?;

        info!(
            source = %path.display(),
            destination = %destination.display(),
            "exported test result"
        );
        Ok(destination)
    }

    /// Category directory for a result, numbering repeated `other` directories
    fn next_dir(&mut self, path: &Path) -> String {
        let relative = self
            .root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        let dir = export_dir(relative);
        if dir != OTHER_DIR_NAME {
            return dir;
        }

        let index = self.other_dirs;
        self.other_dirs += 1;
        if index == 0 {
            dir
        } else {
            format!("{}-{}", dir, index)
        }
    }
}

/// Category of a result file derived from its location
///
/// `<module>/build/test-results/testDemoDebugUnitTest/TEST-x.xml` maps to
/// `<module>-demoDebug`; anything else maps to [`OTHER_DIR_NAME`].
pub fn export_dir(path: &Path) -> String {
    let names: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    // Need at least test-results/<task>/<file>
    if names.len() < 3 {
        return OTHER_DIR_NAME.to_string();
    }
    let task_dir = &names[names.len() - 2];
    let results_dir = &names[names.len() - 3];
    if results_dir != TEST_RESULTS_DIR_NAME {
        return OTHER_DIR_NAME.to_string();
    }

    let variant = variant_name(task_dir);
    if variant.is_empty() {
        return OTHER_DIR_NAME.to_string();
    }

    let module = names
        .len()
        .checked_sub(5)
        .filter(|_| names[names.len() - 4] == BUILD_DIR_NAME)
        .map(|i| names[i].as_str());

    match module {
        Some(module) if !module.is_empty() && module != "/" => format!("{}-{}", module, variant),
        _ => variant,
    }
}

/// `testDemoDebugUnitTest` → `demoDebug`
fn variant_name(task_dir: &str) -> String {
    let trimmed = task_dir.strip_prefix("test").unwrap_or(task_dir);
    let trimmed = trimmed.strip_suffix("UnitTest").unwrap_or(trimmed);

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_dir() {
        assert_eq!(
            export_dir(Path::new("/p/app/build/test-results/testDemoDebugUnitTest/TEST-a.xml")),
            "app-demoDebug"
        );
        assert_eq!(
            export_dir(Path::new("build/test-results/testReleaseUnitTest/TEST-a.xml")),
            "release"
        );
        assert_eq!(export_dir(Path::new("/p/app/build/reports/TEST-a.xml")), OTHER_DIR_NAME);
        assert_eq!(export_dir(Path::new("TEST-a.xml")), OTHER_DIR_NAME);
    }

    #[test]
    fn test_other_dirs_are_numbered() {
        let mut exporter = TestAddonExporter::new("/sink");
        let stray = Path::new("/p/custom/TEST-a.xml");
        let known = Path::new("/p/app/build/test-results/testDebugUnitTest/TEST-a.xml");

        assert_eq!(exporter.next_dir(stray), "other");
        assert_eq!(exporter.next_dir(known), "app-debug");
        assert_eq!(exporter.next_dir(stray), "other-1");
        assert_eq!(exporter.next_dir(stray), "other-2");
    }

    #[test]
    fn test_root_project_results_ignore_checkout_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("checkout-dir");
        let results = root.join("build/test-results/testDebugUnitTest");
        std::fs::create_dir_all(&results).unwrap();
        let xml = results.join("TEST-a.xml");
        std::fs::write(&xml, "<testsuite/>").unwrap();

        let sink = temp.path().join("sink");
        let mut exporter = TestAddonExporter::new(&sink).with_root(&root);
        assert_eq!(exporter.export(&xml).unwrap(), sink.join("debug/TEST-a.xml"));

        let module = root.join("app/build/test-results/testDebugUnitTest/TEST-a.xml");
        assert_eq!(exporter.next_dir(&module), "app-debug");
    }

    #[test]
    fn test_export_all_writes_results_and_info() {
        let temp = TempDir::new().unwrap();
        let results = temp.path().join("app/build/test-results/testDebugUnitTest");
        std::fs::create_dir_all(&results).unwrap();
        let xml = results.join("TEST-com.example.AppTest.xml");
        std::fs::write(&xml, "<testsuite/>").unwrap();
        let stray = temp.path().join("TEST-stray.xml");
        std::fs::write(&stray, "<testsuite/>").unwrap();

        let sink = temp.path().join("sink");
        let mut exporter = TestAddonExporter::new(&sink);
        let missing = temp.path().join("gone/TEST-missing.xml");
        let summary = exporter.export_all([xml.as_path(), missing.as_path(), stray.as_path()]);

        assert_eq!(summary.exported.len(), 2);
        assert_eq!(summary.failed.len(), 1);

        let copied = sink.join("app-debug/TEST-com.example.AppTest.xml");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "<testsuite/>");

        let info: serde_json::Value =
            serde_json::from_slice(&std::fs::read(sink.join("app-debug/test-info.json")).unwrap())
                .unwrap();
        assert_eq!(info["test-name"], "app-debug");

        // The failed export consumed "other", so the stray file lands in "other-1"
        assert!(sink.join("other-1/TEST-stray.xml").exists());
    }
}
