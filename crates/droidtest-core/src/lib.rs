//! droidtest core - variant discovery and report export for Android unit tests
//!
//! The crate covers the two pieces of logic a unit test CI step needs around
//! Gradle:
//!
//! - **Variant discovery**: parse `gradle tasks --all` output into a
//!   module → variant map and narrow it with module/variant selectors
//!   ([`gradle`]).
//! - **Report export**: locate HTML and XML reports written by the run and
//!   export them to a deploy directory without overwriting earlier exports
//!   ([`artifacts`], [`reports`]).
//!
//! Missing reports never fail a run. Configuration, lookup and task listing
//! failures do, before any test is executed.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod gradle;
pub mod reports;

pub use artifacts::{Artifact, ArtifactExporter, ArtifactLocator, ExportSummary, SearchMode};
pub use config::{resolve_config, ConfigOverrides, StepConfig};
pub use error::{ConfigError, DroidTestError, LookupError, Result};
pub use gradle::{
    parse_variants, ConflictTable, GradleProject, TaskFamily, VariantFilter, Variants,
};
pub use reports::{CollectedReports, ReportCollector};
