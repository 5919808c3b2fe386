//! Run command - run unit tests and export their reports

use std::time::SystemTime;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{info, warn};

use droidtest_core::gradle::split_arguments;
use droidtest_core::reports::{CollectedReports, ReportCollector};
use droidtest_core::{ExportSummary, GradleProject, TaskFamily, Variants};

use super::variants::VariantSelection;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat, StepArgs};
use crate::exit_codes;
use crate::Logging;

/// Run unit tests and export their reports
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub step: StepArgs,
}

/// JSON summary of a run
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    success: bool,
    command: String,
    exit_code: Option<i32>,
    selected: &'a Variants,
    reports: &'a CollectedReports,
}

impl RunCommand {
    pub fn execute(&self, cli: &Cli, logging: &Logging) -> anyhow::Result<i32> {
        let config = self.step.resolve(logging)?;
        let text = cli.prints_text();

        if text {
            println!("{}", output::header("Configuration:"));
            println!("{}", output::key_value("Project", &output::path(&config.project_location)));
            println!("{}", output::key_value("Module", config.module_selector().unwrap_or("all")));
            println!("{}", output::key_value("Variant", config.variant_selector().unwrap_or("all")));
            println!("{}", output::key_value("Deploy dir", &output::path(&config.deploy_dir())));
            if let Some(sink) = config.test_result_dir() {
                println!("{}", output::key_value("Test result dir", &output::path(sink)));
            }
            println!();
        }

        // Everything that can abort the step happens before tests run
        let args = split_arguments(&config.arguments)?;
        let project = GradleProject::open(&config.project_location)?;
        if text {
            output::info("Listing Gradle tasks");
            println!();
        }
        let selection = VariantSelection::resolve(&project, &config)?;
        if text {
            selection.print();
        }

        let started = SystemTime::now();
        let task = project.task(TaskFamily::test());
        let command = task.command(&selection.selected, &args);

        if text {
            println!("{}", output::header("Run test:"));
            println!();
            println!("{} {}", style("$").green().bold(), command.printable());
            println!();
        }

        let (tests_passed, exit_code) = match command.run() {
            Ok(status) if status.success() => (true, status.code()),
            Ok(status) => {
                warn!(status = %status, "test task failed");
                output::error(&format!("Test task failed, {}", status));
                (false, status.code())
            }
            Err(e) => {
                warn!(error = %e, "test task could not be started");
                output::error(&format!("Test task failed, {}", e));
                (false, None)
            }
        };

        let reports = collect_reports(&ReportCollector::from_config(&config), started);
        if text {
            println!();
            println!("{}", output::header("Export HTML results:"));
            print_summary(&reports.html);
            println!("{}", output::header("Export XML results:"));
            print_summary(&reports.xml);
            if let Some(test_addon) = &reports.test_addon {
                println!("{}", output::header("Export XML results for test addon:"));
                print_summary(test_addon);
            }
        }
        info!(
            exported = reports.exported_count(),
            tests_passed,
            "unit test step finished"
        );

        if cli.format == OutputFormat::Json {
            let summary = RunSummary {
                success: tests_passed,
                command: command.printable(),
                exit_code,
                selected: &selection.selected,
                reports: &reports,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if text && tests_passed {
            output::success("Unit tests passed");
        }

        Ok(if tests_passed {
            exit_codes::SUCCESS
        } else {
            exit_codes::TEST_FAILED
        })
    }
}

/// Collect reports without letting an export problem replace the test outcome
fn collect_reports(collector: &ReportCollector, started: SystemTime) -> CollectedReports {
    collector.collect(started).unwrap_or_else(|e| {
        warn!(error = %e, "failed to collect reports");
        output::warning(&format!("Failed to collect reports: {}", e));
        CollectedReports::default()
    })
}

fn print_summary(summary: &ExportSummary) {
    println!();
    if summary.is_empty() {
        output::warning("No artifacts found");
    }
    for exported in &summary.exported {
        println!(
            "  Export [ {} => {} ]",
            output::path(&exported.source),
            output::path(&exported.destination)
        );
    }
    for failed in &summary.failed {
        output::warning(&format!(
            "Failed to export {}: {}",
            output::display_path(&failed.source),
            failed.reason
        ));
    }
    println!();
}
