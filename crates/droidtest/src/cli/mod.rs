//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use droidtest_core::{resolve_config, ConfigOverrides, StepConfig};

use crate::Logging;
use commands::{InitCommand, RunCommand, VariantsCommand};

/// droidtest - Run Android unit tests with Gradle and collect their reports
#[derive(Debug, Parser)]
#[command(name = "droidtest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run unit tests and export their reports
    Run(RunCommand),

    /// List unit test variants and show which ones are selected
    Variants(VariantsCommand),

    /// Write a starter configuration file
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command, returning the process exit code
    pub fn execute(&self, logging: &Logging) -> anyhow::Result<i32> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match &self.command {
            Commands::Run(cmd) => cmd.execute(self, logging),
            Commands::Variants(cmd) => cmd.execute(self, logging),
            Commands::Init(cmd) => cmd.execute(self),
        }
    }

    /// Whether human-readable progress should be printed
    pub fn prints_text(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

/// Step settings shared by commands that talk to Gradle
///
/// Environment variable names match the step inputs CI pipelines already
/// export, so the binary can run as a drop-in step.
#[derive(Debug, Clone, Args)]
pub struct StepArgs {
    /// Root of the Gradle project
    #[arg(short, long, env = "project_location")]
    pub project: Option<PathBuf>,

    /// Configuration file (default: search for droidtest.toml/yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Module to test (default: all modules)
    #[arg(short, long, env = "module")]
    pub module: Option<String>,

    /// Variant to test, e.g. `debug` (default: all variants)
    #[arg(long, env = "variant")]
    pub variant: Option<String>,

    /// Extra arguments passed to Gradle
    #[arg(long, env = "arguments", allow_hyphen_values = true)]
    pub arguments: Option<String>,

    /// Pattern of the HTML report directories
    #[arg(long, env = "report_path_pattern")]
    pub report_path_pattern: Option<String>,

    /// Pattern of the XML result directories
    #[arg(long, env = "result_path_pattern")]
    pub result_path_pattern: Option<String>,

    /// Directory receiving zipped reports
    #[arg(long, env = "BITRISE_DEPLOY_DIR")]
    pub deploy_dir: Option<PathBuf>,

    /// Test results sink for per-variant XML results
    #[arg(long, env = "BITRISE_TEST_RESULT_DIR")]
    pub test_result_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "is_debug")]
    pub debug: bool,
}

impl StepArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_location: self.project.clone(),
            report_path_pattern: self.report_path_pattern.clone(),
            result_path_pattern: self.result_path_pattern.clone(),
            module: self.module.clone(),
            variant: self.variant.clone(),
            arguments: self.arguments.clone(),
            is_debug: self.debug.then_some(true),
            deploy_dir: self.deploy_dir.clone(),
            test_result_dir: self.test_result_dir.clone(),
        }
    }

    /// Resolve the effective configuration and apply its log level
    pub fn resolve(&self, logging: &Logging) -> anyhow::Result<StepConfig> {
        let cwd = std::env::current_dir()?;
        let search_dir = self
            .project
            .as_ref()
            .map(|p| cwd.join(p))
            .unwrap_or_else(|| cwd.clone());

        let mut config = resolve_config(self.config.as_deref(), &search_dir, self.overrides())?;
        if config.project_location.is_relative() {
            config.project_location = cwd.join(&config.project_location);
        }

        if config.is_debug {
            logging.enable_debug();
        }
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}
