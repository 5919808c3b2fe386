//! Gradle project access: task listing and unit test invocation

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info};

use crate::error::{ConfigError, DroidTestError, Result};

use super::tasks::{parse_variants, ConflictTable, TaskFamily};
use super::variants::Variants;

/// A Gradle project rooted at a directory
#[derive(Debug, Clone)]
pub struct GradleProject {
    location: PathBuf,
    gradle: String,
}

impl GradleProject {
    /// Open a project, preferring the Gradle wrapper when present
    pub fn open(location: impl Into<PathBuf>) -> Result<Self> {
        let location = location.into();
        if !location.is_dir() {
            return Err(ConfigError::ProjectNotFound(location).into());
        }

        let gradle = gradle_cmd(&location);
        debug!(location = %location.display(), gradle = %gradle, "opened gradle project");

        Ok(Self { location, gradle })
    }

    /// Tasks of one family in this project
    pub fn task(&self, family: TaskFamily) -> GradleTask<'_> {
        GradleTask {
            project: self,
            family,
            conflicts: ConflictTable::default(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.gradle);
        cmd.args(args).current_dir(&self.location);

        if std::env::var_os("ANDROID_HOME").is_none() {
            if let Some(android_sdk) = std::env::var_os("ANDROID_SDK_ROOT") {
                cmd.env("ANDROID_HOME", android_sdk);
            }
        }

        cmd
    }

    fn printable(&self, args: &[String]) -> String {
        std::iter::once(self.gradle.as_str())
            .chain(args.iter().map(String::as_str))
            .map(|arg| shlex::try_quote(arg).map(|q| q.into_owned()).unwrap_or_else(|_| arg.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Get the gradle command (wrapper or global)
fn gradle_cmd(path: &Path) -> String {
    let wrapper = if cfg!(windows) {
        path.join("gradlew.bat")
    } else {
        path.join("gradlew")
    };

    if wrapper.exists() {
        wrapper.to_string_lossy().to_string()
    } else {
        which::which("gradle")
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| "gradle".to_string())
    }
}

/// A task family bound to a project
#[derive(Debug, Clone)]
pub struct GradleTask<'a> {
    project: &'a GradleProject,
    family: TaskFamily,
    conflicts: ConflictTable,
}

impl<'a> GradleTask<'a> {
    /// Replace the conflict table used when parsing the task listing
    pub fn with_conflicts(mut self, conflicts: ConflictTable) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// List every variant of this task family in every module
    pub fn all_variants(&self) -> Result<Variants> {
        let args = listing_args();
        let command = self.project.printable(&args);
        info!(command = %command, "listing gradle tasks");

        let output = self
            .project
            .command(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DroidTestError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DroidTestError::Listing {
                command,
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }

        let variants = parse_variants(&stdout, &self.family, &self.conflicts);
        debug!(
            family = self.family.name(),
            modules = variants.len(),
            variants = variants.variant_count(),
            "parsed task listing"
        );
        Ok(variants)
    }

    /// Command running the given variants with extra arguments appended
    pub fn command(&self, variants: &Variants, extra_args: &[String]) -> GradleCommand<'a> {
        let mut args: Vec<String> = variants
            .iter()
            .flat_map(|(module, list)| list.iter().map(move |v| (module, v)))
            .map(|(module, variant)| self.family.task_name(module, variant))
            .collect();
        args.extend(extra_args.iter().cloned());

        GradleCommand {
            project: self.project,
            args,
        }
    }
}

fn listing_args() -> Vec<String> {
    ["tasks", "--all", "--console=plain", "--quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A ready-to-run Gradle invocation
#[derive(Debug, Clone)]
pub struct GradleCommand<'a> {
    project: &'a GradleProject,
    args: Vec<String>,
}

impl GradleCommand<'_> {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Shell-quoted command line for display
    pub fn printable(&self) -> String {
        self.project.printable(&self.args)
    }

    /// Run with inherited stdio, blocking until Gradle exits
    pub fn run(&self) -> Result<ExitStatus> {
        info!(command = %self.printable(), "running gradle");

        self.project
            .command(&self.args)
            .status()
            .map_err(|e| DroidTestError::Command {
                command: self.printable(),
                message: e.to_string(),
            })
    }
}

/// Split a free-form argument string using shell quoting rules
pub fn split_arguments(arguments: &str) -> Result<Vec<String>> {
    shlex::split(arguments)
        .ok_or_else(|| ConfigError::InvalidArguments(arguments.to_string()).into())
}
