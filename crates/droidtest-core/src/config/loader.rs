//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::{ConfigOverrides, StepConfig};
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<StepConfig> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: StepConfig = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load a config file, resolving a relative project location against its directory
fn load_anchored(path: &Path) -> Result<StepConfig> {
    let mut config = load_config(path)?;
    if config.project_location.is_relative() {
        if let Some(dir) = path.parent() {
            config.project_location = if config.project_location == Path::new(".") {
                dir.to_path_buf()
            } else {
                dir.join(&config.project_location)
            };
        }
    }
    Ok(config)
}

/// Resolve the effective configuration
///
/// Precedence, lowest first: defaults, the explicit `config_file` or a file
/// found from `search_dir`, then `overrides`. The result is validated.
pub fn resolve_config(
    config_file: Option<&Path>,
    search_dir: &Path,
    overrides: ConfigOverrides,
) -> Result<StepConfig> {
    let base = match config_file {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        Some(path) => load_anchored(path)?,
        None => match find_config(search_dir) {
            Some(path) => load_anchored(&path)?,
            None => StepConfig::default(),
        },
    };

    let config = base.merge(overrides);
    validate_config(&config)?;
    Ok(config)
}
