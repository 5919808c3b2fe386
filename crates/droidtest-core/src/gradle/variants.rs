//! Module → variant mapping and selector-based filtering

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LookupError;

/// Suffix Gradle appends to unit test variant names (`testDebugUnitTest`)
pub const UNIT_TEST_SUFFIX: &str = "UnitTest";

/// Variants of a task family, keyed by module name
///
/// The empty module name denotes the root project. Variant order within a
/// module is the order in which the task listing produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variants(BTreeMap<String, Vec<String>>);

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant to a module, creating the module if needed
    pub fn push(&mut self, module: impl Into<String>, variant: impl Into<String>) {
        self.0.entry(module.into()).or_default().push(variant.into());
    }

    /// Remove repeated variants within each module, keeping first occurrences
    pub fn dedup(&mut self) {
        for variants in self.0.values_mut() {
            let mut seen = Vec::with_capacity(variants.len());
            variants.retain(|v| {
                if seen.contains(v) {
                    false
                } else {
                    seen.push(v.clone());
                    true
                }
            });
        }
    }

    pub fn get(&self, module: &str) -> Option<&[String]> {
        self.0.get(module).map(Vec::as_slice)
    }

    pub fn contains(&self, module: &str, variant: &str) -> bool {
        self.get(module)
            .map(|variants| variants.iter().any(|v| v == variant))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(m, v)| (m.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of variants across all modules
    pub fn variant_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl<M, V> FromIterator<(M, Vec<V>)> for Variants
where
    M: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (M, Vec<V>)>>(iter: I) -> Self {
        let mut variants = Self::new();
        for (module, list) in iter {
            let module = module.into();
            let entry = variants.0.entry(module).or_default();
            entry.extend(list.into_iter().map(Into::into));
        }
        variants
    }
}

/// Narrows a variant map by module and variant selectors
#[derive(Debug, Clone)]
pub struct VariantFilter {
    module: Option<String>,
    variant: Option<String>,
    suffix: String,
}

impl VariantFilter {
    /// Create a filter; empty selectors select everything
    pub fn new(module: Option<&str>, variant: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);

        Self {
            module: non_empty(module),
            variant: non_empty(variant),
            suffix: UNIT_TEST_SUFFIX.to_string(),
        }
    }

    /// Override the suffix appended to the variant selector before matching
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Apply the filter, returning a new map
    pub fn apply(&self, variants: &Variants) -> Result<Variants, LookupError> {
        let working = match &self.module {
            Some(module) => {
                let list = variants
                    .get(module)
                    .ok_or_else(|| LookupError::ModuleNotFound(module.clone()))?;
                Variants::from_iter([(module.clone(), list.to_vec())])
            }
            None => variants.clone(),
        };

        let Some(selector) = &self.variant else {
            return Ok(working);
        };

        let wanted = format!("{}{}", selector, self.suffix).to_lowercase();
        let mut filtered = Variants::new();
        for (module, list) in working.iter() {
            for variant in list.iter().filter(|v| v.to_lowercase() == wanted) {
                filtered.push(module, variant.clone());
            }
        }

        if filtered.is_empty() {
            return Err(LookupError::VariantNotFound(selector.clone()));
        }

        debug!(
            selector = %selector,
            modules = filtered.len(),
            "variant selector matched"
        );
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Variants {
        Variants::from_iter([
            ("", vec!["DebugUnitTest", "ReleaseUnitTest"]),
            ("app", vec!["DemoDebugUnitTest", "ReleaseUnitTest"]),
            ("lib", vec!["DebugUnitTest"]),
        ])
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let mut variants = Variants::from_iter([("app", vec!["B", "A", "B", "C", "A"])]);
        variants.dedup();
        assert_eq!(variants.get("app").unwrap(), ["B", "A", "C"]);
    }

    #[test]
    fn test_filter_release_on_root_module() {
        let variants = Variants::from_iter([("", vec!["DebugUnitTest", "ReleaseUnitTest"])]);
        let filtered = VariantFilter::new(None, Some("release"))
            .apply(&variants)
            .unwrap();

        assert_eq!(filtered, Variants::from_iter([("", vec!["ReleaseUnitTest"])]));
    }

    #[test]
    fn test_empty_selectors_return_equal_map() {
        let variants = sample();
        let filtered = VariantFilter::new(Some(""), Some("")).apply(&variants).unwrap();
        assert_eq!(filtered, variants);

        let filtered = VariantFilter::new(None, None).apply(&variants).unwrap();
        assert_eq!(filtered, variants);
    }

    #[test]
    fn test_module_selector_drops_other_modules() {
        let filtered = VariantFilter::new(Some("app"), None).apply(&sample()).unwrap();
        assert_eq!(
            filtered,
            Variants::from_iter([("app", vec!["DemoDebugUnitTest", "ReleaseUnitTest"])])
        );
    }

    #[test]
    fn test_unknown_module_fails() {
        let err = VariantFilter::new(Some("wear"), None).apply(&sample()).unwrap_err();
        assert_eq!(err, LookupError::ModuleNotFound("wear".to_string()));
    }

    #[test]
    fn test_unknown_variant_fails() {
        let err = VariantFilter::new(None, Some("staging")).apply(&sample()).unwrap_err();
        assert_eq!(err, LookupError::VariantNotFound("staging".to_string()));

        let err = VariantFilter::new(Some("lib"), Some("release"))
            .apply(&sample())
            .unwrap_err();
        assert_eq!(err, LookupError::VariantNotFound("release".to_string()));
    }

    #[test]
    fn test_variant_selector_spans_modules() {
        let filtered = VariantFilter::new(None, Some("RELEASE")).apply(&sample()).unwrap();
        assert_eq!(
            filtered,
            Variants::from_iter([("", vec!["ReleaseUnitTest"]), ("app", vec!["ReleaseUnitTest"])])
        );
    }

    #[test]
    fn test_selector_must_match_whole_name() {
        let err = VariantFilter::new(None, Some("debug")).apply(&Variants::from_iter([(
            "app",
            vec!["DemoDebugUnitTest"],
        )]));
        assert!(err.is_err());
    }

    #[test]
    fn test_module_then_variant_equals_joint_filter() {
        let variants = sample();
        let staged = VariantFilter::new(Some("app"), None)
            .apply(&variants)
            .and_then(|v| VariantFilter::new(None, Some("release")).apply(&v))
            .unwrap();
        let joint = VariantFilter::new(Some("app"), Some("release"))
            .apply(&variants)
            .unwrap();

        assert_eq!(staged, joint);
    }

    #[test]
    fn test_filter_is_idempotent_and_pure() {
        let variants = sample();
        let filter = VariantFilter::new(Some("app"), Some("demoDebug"));
        let once = filter.apply(&variants).unwrap();
        let twice = filter.apply(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(variants, sample());
    }

    #[test]
    fn test_custom_suffix() {
        let variants = Variants::from_iter([("app", vec!["Release", "Debug"])]);
        let filtered = VariantFilter::new(None, Some("debug"))
            .with_suffix("")
            .apply(&variants)
            .unwrap();
        assert_eq!(filtered, Variants::from_iter([("app", vec!["Debug"])]));
    }
}
