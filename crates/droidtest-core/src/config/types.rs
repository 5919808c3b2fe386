//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_REPORT_PATH_PATTERN, DEFAULT_RESULT_PATH_PATTERN};

/// Settings for one unit test step run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Root of the Gradle project
    pub project_location: PathBuf,

    /// Pattern locating HTML report directories
    pub report_path_pattern: String,

    /// Pattern locating XML result directories
    pub result_path_pattern: String,

    /// Only run this module (empty: all modules)
    pub module: Option<String>,

    /// Only run this variant, e.g. `debug` (empty: all variants)
    pub variant: Option<String>,

    /// Extra arguments appended to the Gradle test command
    pub arguments: String,

    /// Enable debug logging
    pub is_debug: bool,

    /// Directory receiving zipped reports
    pub deploy_dir: Option<PathBuf>,

    /// Test results sink; enables the per-variant XML export when set
    pub test_result_dir: Option<PathBuf>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            project_location: PathBuf::from("."),
            report_path_pattern: DEFAULT_REPORT_PATH_PATTERN.to_string(),
            result_path_pattern: DEFAULT_RESULT_PATH_PATTERN.to_string(),
            module: None,
            variant: None,
            arguments: String::new(),
            is_debug: false,
            deploy_dir: None,
            test_result_dir: None,
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// Every `Some` replaces the corresponding file or default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_location: Option<PathBuf>,
    pub report_path_pattern: Option<String>,
    pub result_path_pattern: Option<String>,
    pub module: Option<String>,
    pub variant: Option<String>,
    pub arguments: Option<String>,
    pub is_debug: Option<bool>,
    pub deploy_dir: Option<PathBuf>,
    pub test_result_dir: Option<PathBuf>,
}

impl StepConfig {
    /// Apply overrides on top of this configuration
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(v) = overrides.project_location {
            self.project_location = v;
        }
        if let Some(v) = overrides.report_path_pattern {
            self.report_path_pattern = v;
        }
        if let Some(v) = overrides.result_path_pattern {
            self.result_path_pattern = v;
        }
        if overrides.module.is_some() {
            self.module = overrides.module;
        }
        if overrides.variant.is_some() {
            self.variant = overrides.variant;
        }
        if let Some(v) = overrides.arguments {
            self.arguments = v;
        }
        if let Some(v) = overrides.is_debug {
            self.is_debug = v;
        }
        if overrides.deploy_dir.is_some() {
            self.deploy_dir = overrides.deploy_dir;
        }
        if overrides.test_result_dir.is_some() {
            self.test_result_dir = overrides.test_result_dir;
        }
        self
    }

    /// Module selector, treating an empty string as unset
    pub fn module_selector(&self) -> Option<&str> {
        self.module.as_deref().filter(|m| !m.is_empty())
    }

    /// Variant selector, treating an empty string as unset
    pub fn variant_selector(&self) -> Option<&str> {
        self.variant.as_deref().filter(|v| !v.is_empty())
    }

    /// Deploy directory, falling back to `<project>/build/droidtest-deploy`
    pub fn deploy_dir(&self) -> PathBuf {
        self.deploy_dir
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| self.project_location.join("build").join("droidtest-deploy"))
    }

    /// Test results sink, if one is configured
    pub fn test_result_dir(&self) -> Option<&PathBuf> {
        self.test_result_dir.as_ref().filter(|d| !d.as_os_str().is_empty())
    }
}
