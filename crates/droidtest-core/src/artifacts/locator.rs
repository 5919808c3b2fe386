//! Report discovery with a modification-time window
//!
//! Reports written by the current test run are preferred. When none are
//! found the search is repeated without the time window, since Gradle may
//! skip up-to-date test tasks and leave older reports in place.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ConfigError, Result};

use super::Artifact;

/// What kind of filesystem entry a search matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Report directories (HTML reports, XML result folders)
    Directories,
    /// Individual files (XML result files)
    Files,
}

/// One pass over the project tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAttempt {
    /// Only entries modified at or after the given time
    Since(SystemTime),
    /// Entries of any age
    AnyTime,
}

impl SearchAttempt {
    /// Attempts made for a threshold, in order; the first non-empty result wins
    pub fn plan(threshold: Option<SystemTime>) -> Vec<Self> {
        match threshold {
            Some(since) => vec![Self::Since(since), Self::AnyTime],
            None => vec![Self::AnyTime],
        }
    }

    fn accepts(&self, modified: Option<SystemTime>) -> bool {
        match self {
            Self::Since(since) => modified.is_some_and(|m| m >= *since),
            Self::AnyTime => true,
        }
    }
}

/// Finds report artifacts below a project root
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    root: PathBuf,
}

impl ArtifactLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find artifacts matching `pattern`
    ///
    /// Returns an empty list when nothing matches; only an invalid pattern
    /// is an error.
    pub fn find(
        &self,
        pattern: &str,
        threshold: Option<SystemTime>,
        mode: SearchMode,
        include_module_name: bool,
    ) -> Result<Vec<Artifact>> {
        let matcher = compile_pattern(pattern)?;

        for attempt in SearchAttempt::plan(threshold) {
            let artifacts = self.search(&matcher, attempt, mode, include_module_name);
            if !artifacts.is_empty() {
                debug!(pattern, count = artifacts.len(), ?attempt, "found artifacts");
                return Ok(artifacts);
            }

            match attempt {
                SearchAttempt::Since(_) => {
                    warn!(pattern, "no artifacts modified during this run, retrying without modification time check");
                }
                SearchAttempt::AnyTime => {
                    warn!(pattern, "no artifacts found without modification time check");
                    warn!("If the report location was changed in the Gradle build files, the path pattern needs to be changed accordingly.");
                }
            }
        }

        Ok(Vec::new())
    }

    fn search(
        &self,
        matcher: &GlobMatcher,
        attempt: SearchAttempt,
        mode: SearchMode,
        include_module_name: bool,
    ) -> Vec<Artifact> {
        let mut artifacts = Vec::new();
        let mut walker = WalkDir::new(&self.root).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let Ok(entry) = entry else { continue };

            let is_dir = entry.file_type().is_dir();
            let wanted = match mode {
                SearchMode::Directories => is_dir,
                SearchMode::Files => entry.file_type().is_file(),
            };
            if !wanted || !matcher.is_match(entry.path()) {
                continue;
            }

            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            if !attempt.accepts(modified) {
                continue;
            }

            // Reports nested inside a matched report directory belong to it
            if is_dir {
                walker.skip_current_dir();
            }

            let artifact = if include_module_name {
                Artifact::with_module_name(entry.path(), &self.root)
            } else {
                Artifact::new(entry.path())
            };
            artifacts.push(artifact);
        }

        artifacts
    }
}

/// Compile a report path pattern; `*` also matches path separators
fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: "pattern is empty".to_string(),
        }
        .into());
    }

    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Make sure a result directory pattern addresses the XML files inside it
pub fn xml_file_pattern(dir_pattern: &str) -> String {
    if dir_pattern.ends_with("*.xml") {
        dir_pattern.to_string()
    } else {
        format!("{}*.xml", dir_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for dir in [
            "app/build/reports/tests/testDebugUnitTest",
            "app/build/test-results/testDebugUnitTest",
            "lib/build/reports/tests",
            "app/src/main",
        ] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        std::fs::write(
            root.join("app/build/test-results/testDebugUnitTest/TEST-com.example.AppTest.xml"),
            "<testsuite/>",
        )
        .unwrap();
        std::fs::write(root.join("app/build/reports/tests/testDebugUnitTest/index.html"), "").unwrap();
        temp
    }

    #[test]
    fn test_attempt_plan() {
        let now = SystemTime::now();
        assert_eq!(
            SearchAttempt::plan(Some(now)),
            vec![SearchAttempt::Since(now), SearchAttempt::AnyTime]
        );
        assert_eq!(SearchAttempt::plan(None), vec![SearchAttempt::AnyTime]);
    }

    #[test]
    fn test_find_report_directories() {
        let temp = project();
        let locator = ArtifactLocator::new(temp.path());

        let artifacts = locator
            .find("*build/reports/tests", None, SearchMode::Directories, true)
            .unwrap();

        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["app-tests", "lib-tests"]);
    }

    #[test]
    fn test_find_files() {
        let temp = project();
        let locator = ArtifactLocator::new(temp.path());

        let artifacts = locator
            .find(&xml_file_pattern("*build/test-results"), None, SearchMode::Files, false)
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "TEST-com.example.AppTest.xml");
    }

    #[test]
    fn test_threshold_in_future_falls_back_to_any_time() {
        let temp = project();
        let locator = ArtifactLocator::new(temp.path());
        let future = SystemTime::now() + Duration::from_secs(3600);

        let artifacts = locator
            .find("*build/reports/tests", Some(future), SearchMode::Directories, true)
            .unwrap();
        assert_eq!(artifacts.len(), 2);
    }

    #[test]
    fn test_threshold_in_past_matches_first_attempt() {
        let temp = project();
        let locator = ArtifactLocator::new(temp.path());
        let past = SystemTime::now() - Duration::from_secs(3600);

        let artifacts = locator
            .find("*build/test-results", Some(past), SearchMode::Directories, true)
            .unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "app-test-results");
    }

    #[test]
    fn test_double_miss_returns_empty_list() {
        let temp = project();
        let locator = ArtifactLocator::new(temp.path());
        let future = SystemTime::now() + Duration::from_secs(3600);

        let artifacts = locator
            .find("*build/outputs/androidTest-results", Some(future), SearchMode::Directories, true)
            .unwrap();
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_missing_root_returns_empty_list() {
        let temp = TempDir::new().unwrap();
        let locator = ArtifactLocator::new(temp.path().join("nope"));
        let artifacts = locator
            .find("*build/reports/tests", None, SearchMode::Directories, false)
            .unwrap();
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let locator = ArtifactLocator::new(".");
        assert!(locator.find("*build/[reports", None, SearchMode::Files, false).is_err());
        assert!(locator.find("  ", None, SearchMode::Files, false).is_err());
    }

    #[test]
    fn test_xml_file_pattern() {
        assert_eq!(xml_file_pattern("*build/test-results"), "*build/test-results*.xml");
        assert_eq!(xml_file_pattern("*build/test-results/*.xml"), "*build/test-results/*.xml");
    }
}
