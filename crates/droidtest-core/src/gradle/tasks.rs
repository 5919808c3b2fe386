//! Parsing of `gradle tasks --all` output
//!
//! The listing is loosely structured text, one task per line:
//!
//! ```text
//! app:lintMyflavorRelease - Runs lint on the MyflavorRelease build.
//! app:lintVitalMyflavorRelease - Runs lint on the MyflavorRelease build.
//! testDebugUnitTest - Run unit tests for the debug build.
//! ```
//!
//! Parsing is a pure function over the lines; malformed lines are skipped.

use std::collections::HashMap;

use tracing::trace;

use super::variants::Variants;

/// Separator between module path segments and the task name
pub const MODULE_DELIMITER: char = ':';

/// A family of Gradle tasks sharing a name prefix, e.g. `test` or `lint`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskFamily(String);

impl TaskFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unit test family
    pub fn test() -> Self {
        Self::new("test")
    }

    /// The lint family
    pub fn lint() -> Self {
        Self::new("lint")
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Gradle task name for one variant of this family in a module
    pub fn task_name(&self, module: &str, variant: &str) -> String {
        if module.is_empty() {
            format!("{}{}", self.0, variant)
        } else {
            format!("{}{}{}{}", module, MODULE_DELIMITER, self.0, variant)
        }
    }
}

/// Longer task prefixes that collide with a family prefix
///
/// `lint` is a prefix of `lintVital`, so without this table
/// `lintVitalRelease` would be read as the variant `VitalRelease`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictTable(HashMap<String, Vec<String>>);

impl ConflictTable {
    /// A table with no conflicts registered
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Register conflicting prefixes for a family
    pub fn with(mut self, family: impl Into<String>, prefixes: &[&str]) -> Self {
        self.0
            .entry(family.into())
            .or_default()
            .extend(prefixes.iter().map(|p| p.to_string()));
        self
    }

    /// Conflicting prefixes registered for a family
    pub fn conflicts(&self, family: &TaskFamily) -> &[String] {
        self.0.get(family.name()).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ConflictTable {
    fn default() -> Self {
        Self::empty()
            .with("lint", &["lintVital", "lintFix"])
            .with("test", &[])
    }
}

/// Parse a task listing into the variants of `family`, grouped by module
pub fn parse_variants(output: &str, family: &TaskFamily, conflicts: &ConflictTable) -> Variants {
    let mut variants = Variants::new();

    for (module, leaf) in output.lines().filter_map(task_token).map(split_module) {
        if let Some(variant) = variant_of(leaf, family, conflicts) {
            trace!(module, variant, "found variant task");
            variants.push(module, variant);
        }
    }

    variants.dedup();
    variants
}

/// First whitespace-delimited token of a non-blank line
fn task_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Split `a:b:task` into (`a:b`, `task`); a bare task belongs to the root module
fn split_module(token: &str) -> (&str, &str) {
    match token.rsplit_once(MODULE_DELIMITER) {
        Some((module, leaf)) => (module, leaf),
        None => ("", token),
    }
}

fn variant_of<'a>(leaf: &'a str, family: &TaskFamily, conflicts: &ConflictTable) -> Option<&'a str> {
    let rest = leaf.strip_prefix(family.name())?;

    if conflicts
        .conflicts(family)
        .iter()
        .any(|conflict| leaf.starts_with(conflict.as_str()))
    {
        return None;
    }

    (!rest.is_empty()).then_some(rest)
}
