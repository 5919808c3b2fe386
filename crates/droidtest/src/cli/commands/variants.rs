//! Variants command - show unit test variants and the current selection

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use droidtest_core::gradle::UNIT_TEST_SUFFIX;
use droidtest_core::{GradleProject, StepConfig, TaskFamily, VariantFilter, Variants};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat, StepArgs};
use crate::exit_codes;
use crate::Logging;

/// List unit test variants per module
#[derive(Debug, Args)]
pub struct VariantsCommand {
    #[command(flatten)]
    pub step: StepArgs,
}

/// Every variant next to the ones the selectors picked
#[derive(Debug, Serialize)]
pub struct VariantSelection {
    pub all: Variants,
    pub selected: Variants,
}

impl VariantSelection {
    /// List the project's unit test variants and apply the configured selectors
    pub fn resolve(project: &GradleProject, config: &StepConfig) -> anyhow::Result<Self> {
        let all = project.task(TaskFamily::test()).all_variants()?;
        let selected = VariantFilter::new(config.module_selector(), config.variant_selector())
            .apply(&all)
            .map_err(droidtest_core::DroidTestError::from)?;

        info!(
            modules = selected.len(),
            variants = selected.variant_count(),
            "selected variants"
        );
        Ok(Self { all, selected })
    }

    /// Print the module/variant table, marking selected variants
    pub fn print(&self) {
        println!("{}", output::header("Variants:"));
        println!();

        for (module, variants) in self.all.iter() {
            let module_label = if module.is_empty() {
                style("(root project)").dim().to_string()
            } else {
                style(module).bold().to_string()
            };
            println!("{}:", module_label);

            for variant in variants {
                let name = display_variant(variant);
                if self.selected.contains(module, variant) {
                    println!("  {} {}", style("✓").green().bold(), style(name).green());
                } else {
                    println!("  {} {}", style("-").dim(), style(name).dim());
                }
            }
        }
        println!();
    }
}

/// `DemoDebugUnitTest` → `DemoDebug`
pub fn display_variant(variant: &str) -> &str {
    variant.strip_suffix(UNIT_TEST_SUFFIX).unwrap_or(variant)
}

impl VariantsCommand {
    pub fn execute(&self, cli: &Cli, logging: &Logging) -> anyhow::Result<i32> {
        let config = self.step.resolve(logging)?;
        let project = GradleProject::open(&config.project_location)?;
        let selection = VariantSelection::resolve(&project, &config)?;

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&selection)?);
        } else if !cli.quiet {
            selection.print();
        }

        Ok(exit_codes::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_variant() {
        assert_eq!(display_variant("DemoDebugUnitTest"), "DemoDebug");
        assert_eq!(display_variant("Release"), "Release");
    }

    #[test]
    fn test_selection_serializes_as_module_map() {
        let selection = VariantSelection {
            all: Variants::from_iter([("app", vec!["DebugUnitTest", "ReleaseUnitTest"])]),
            selected: Variants::from_iter([("app", vec!["ReleaseUnitTest"])]),
        };

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["all"]["app"][1], "ReleaseUnitTest");
        assert_eq!(json["selected"]["app"].as_array().unwrap().len(), 1);
    }
}
