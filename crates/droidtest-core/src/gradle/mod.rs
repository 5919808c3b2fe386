//! Gradle task discovery, variant selection and test invocation

pub mod project;
pub mod tasks;
pub mod variants;

pub use project::{split_arguments, GradleCommand, GradleProject, GradleTask};
pub use tasks::{parse_variants, ConflictTable, TaskFamily, MODULE_DELIMITER};
pub use variants::{VariantFilter, Variants, UNIT_TEST_SUFFIX};
