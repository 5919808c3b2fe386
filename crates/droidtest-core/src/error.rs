//! Error types for droidtest

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DroidTestError
pub type Result<T> = std::result::Result<T, DroidTestError>;

/// Main error type for droidtest operations
///
/// Only configuration, lookup and listing failures are represented here.
/// Missing reports and failed exports are downgraded to warnings by the
/// artifact engine and never surface as errors.
#[derive(Debug, Error)]
pub enum DroidTestError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Module or variant lookup errors
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The task listing command failed
    #[error("Failed to list Gradle tasks with `{command}`: {output}")]
    Listing { command: String, output: String },

    /// Gradle could not be started at all
    #[error("Failed to run `{command}`: {message}")]
    Command { command: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DroidTestError {
    /// Get exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Lookup(_) => 3,
            Self::Listing { .. } | Self::Command { .. } => 4,
            Self::Io(_) => 1,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Project directory does not exist
    #[error("Project location does not exist: {0}")]
    ProjectNotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Glob pattern could not be compiled
    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Extra arguments could not be split into words
    #[error("Failed to parse arguments: {0}")]
    InvalidArguments(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Module and variant lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The requested module is not part of the project
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// No module has the requested variant
    #[error("variant: {0} not found in any module")]
    VariantNotFound(String),
}
