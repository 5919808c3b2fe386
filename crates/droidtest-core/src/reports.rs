//! Report collection after a test run
//!
//! Runs the export passes in order: HTML report directories, XML result
//! directories, then (when a sink is configured) individual XML result files
//! for the test addon. Each pass is best effort.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifacts::locator::xml_file_pattern;
use crate::artifacts::{
    ArtifactExporter, ArtifactLocator, ExportFailure, ExportSummary, SearchMode, TestAddonExporter,
};
use crate::config::StepConfig;
use crate::error::Result;

/// Results of every export pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedReports {
    pub html: ExportSummary,
    pub xml: ExportSummary,
    pub test_addon: Option<ExportSummary>,
}

impl CollectedReports {
    /// Total number of artifacts written anywhere
    pub fn exported_count(&self) -> usize {
        self.html.exported.len()
            + self.xml.exported.len()
            + self.test_addon.as_ref().map_or(0, |s| s.exported.len())
    }
}

/// Locates and exports the reports of one test run
#[derive(Debug, Clone)]
pub struct ReportCollector {
    locator: ArtifactLocator,
    exporter: ArtifactExporter,
    report_pattern: String,
    result_pattern: String,
    test_result_dir: Option<PathBuf>,
}

impl ReportCollector {
    pub fn new(project_location: &Path, deploy_dir: &Path) -> Self {
        let defaults = StepConfig::default();
        Self {
            locator: ArtifactLocator::new(project_location),
            exporter: ArtifactExporter::new(deploy_dir),
            report_pattern: defaults.report_path_pattern,
            result_pattern: defaults.result_path_pattern,
            test_result_dir: None,
        }
    }

    /// Collector configured from the step settings
    pub fn from_config(config: &StepConfig) -> Self {
        Self::new(&config.project_location, &config.deploy_dir())
            .with_patterns(&config.report_path_pattern, &config.result_path_pattern)
            .with_test_result_dir(config.test_result_dir().cloned())
    }

    pub fn with_patterns(mut self, report_pattern: &str, result_pattern: &str) -> Self {
        self.report_pattern = report_pattern.to_string();
        self.result_pattern = result_pattern.to_string();
        self
    }

    pub fn with_test_result_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.test_result_dir = dir;
        self
    }

    /// Export HTML reports as zips
    pub fn export_html(&self, started: SystemTime) -> Result<ExportSummary> {
        info!("exporting HTML results");
        self.export_dirs(&self.report_pattern, started)
    }

    /// Export XML result directories as zips
    pub fn export_xml(&self, started: SystemTime) -> Result<ExportSummary> {
        info!("exporting XML results");
        self.export_dirs(&self.result_pattern, started)
    }

    /// Copy individual XML result files into the test addon sink
    ///
    /// Returns `None` when no sink is configured. A lookup failure here is
    /// downgraded to a warning, since the zipped results were already exported.
    pub fn export_test_addon(&self, started: SystemTime) -> Option<ExportSummary> {
        let sink = self.test_result_dir.as_ref()?;
        info!(sink = %sink.display(), "exporting XML results for test addon");

        let pattern = xml_file_pattern(&self.result_pattern);
        let files = match self.locator.find(&pattern, Some(started), SearchMode::Files, false) {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "failed to find XML test results");
                let mut summary = ExportSummary::default();
                summary.failed.push(ExportFailure {
                    source: self.locator.root().join(&pattern),
                    reason: e.to_string(),
                });
                return Some(summary);
            }
        };

        let mut exporter = TestAddonExporter::new(sink).with_root(self.locator.root());
        Some(exporter.export_all(files.iter().map(|a| a.path.as_path())))
    }

    /// Run every export pass in order
    pub fn collect(&self, started: SystemTime) -> Result<CollectedReports> {
        Ok(CollectedReports {
            html: self.export_html(started)?,
            xml: self.export_xml(started)?,
            test_addon: self.export_test_addon(started),
        })
    }

    fn export_dirs(&self, pattern: &str, started: SystemTime) -> Result<ExportSummary> {
        let artifacts = self
            .locator
            .find(pattern, Some(started), SearchMode::Directories, true)?;
        Ok(self.exporter.export_zips(&artifacts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(root: &Path) {
        let reports = root.join("app/build/reports/tests/testDebugUnitTest");
        let results = root.join("app/build/test-results/testDebugUnitTest");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::create_dir_all(&results).unwrap();
        std::fs::write(reports.join("index.html"), "<html/>").unwrap();
        std::fs::write(results.join("TEST-com.example.AppTest.xml"), "<testsuite/>").unwrap();
        std::fs::write(results.join("TEST-com.example.LibTest.xml"), "<testsuite/>").unwrap();
    }

    #[test]
    fn test_collect_all_passes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        project(&root);
        let deploy = temp.path().join("deploy");
        let sink = temp.path().join("sink");

        let collector = ReportCollector::new(&root, &deploy).with_test_result_dir(Some(sink.clone()));
        let reports = collector.collect(SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(reports.html.exported.len(), 1);
        assert_eq!(reports.xml.exported.len(), 1);
        assert!(deploy.join("app-tests.zip").exists());
        assert!(deploy.join("app-test-results.zip").exists());

        assert_eq!(reports.exported_count(), 4);

        let addon = reports.test_addon.unwrap();
        assert_eq!(addon.exported.len(), 2);
        assert!(sink.join("app-debug/TEST-com.example.AppTest.xml").exists());
        assert!(sink.join("app-debug/TEST-com.example.LibTest.xml").exists());
    }

    #[test]
    fn test_root_project_results_use_variant_category() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("checkout-dir");
        let results = root.join("build/test-results/testDebugUnitTest");
        std::fs::create_dir_all(&results).unwrap();
        std::fs::write(results.join("TEST-a.xml"), "<testsuite/>").unwrap();
        let sink = temp.path().join("sink");

        let collector = ReportCollector::new(&root, &temp.path().join("deploy"))
            .with_test_result_dir(Some(sink.clone()));
        let addon = collector.export_test_addon(SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(addon.exported.len(), 1);
        assert_eq!(addon.exported[0].destination, sink.join("debug/TEST-a.xml"));

        let xml = collector.export_xml(SystemTime::UNIX_EPOCH).unwrap();
        assert_eq!(xml.exported[0].destination, temp.path().join("deploy/test-results.zip"));
    }

    #[test]
    fn test_no_sink_skips_test_addon() {
        let temp = TempDir::new().unwrap();
        project(temp.path());

        let collector = ReportCollector::new(temp.path(), &temp.path().join("deploy"));
        assert!(collector.export_test_addon(SystemTime::UNIX_EPOCH).is_none());
    }

    #[test]
    fn test_missing_reports_are_not_errors() {
        let temp = TempDir::new().unwrap();
        let collector = ReportCollector::new(temp.path(), &temp.path().join("deploy"))
            .with_test_result_dir(Some(temp.path().join("sink")));

        let reports = collector.collect(SystemTime::now()).unwrap();
        assert_eq!(reports.exported_count(), 0);
        assert!(reports.html.failed.is_empty());
    }

    #[test]
    fn test_invalid_pattern_fails_collection() {
        let temp = TempDir::new().unwrap();
        let collector = ReportCollector::new(temp.path(), &temp.path().join("deploy"))
            .with_patterns("*build/[reports", "*build/test-results");

        assert!(collector.collect(SystemTime::now()).is_err());
    }
}
