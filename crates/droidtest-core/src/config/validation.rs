//! Configuration validation

use globset::GlobBuilder;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::gradle::{split_arguments, MODULE_DELIMITER};

use super::types::StepConfig;

/// Validate configuration
pub fn validate_config(config: &StepConfig) -> Result<()> {
    debug!("validating configuration");

    if !config.project_location.is_dir() {
        return Err(ConfigError::ProjectNotFound(config.project_location.clone()).into());
    }

    validate_pattern("report_path_pattern", &config.report_path_pattern)?;
    validate_pattern("result_path_pattern", &config.result_path_pattern)?;
    validate_selectors(config)?;
    split_arguments(&config.arguments)?;

    debug!("configuration validation passed");
    Ok(())
}

fn validate_pattern(field: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::invalid(field, "pattern cannot be empty").into());
    }

    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

    Ok(())
}

fn validate_selectors(config: &StepConfig) -> Result<()> {
    if let Some(module) = config.module_selector() {
        if module.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid("module", "must not contain whitespace").into());
        }
    }

    if let Some(variant) = config.variant_selector() {
        if variant.chars().any(|c| c.is_whitespace() || c == MODULE_DELIMITER) {
            return Err(ConfigError::invalid(
                "variant",
                format!(
                    "must be a bare variant name without whitespace or '{}', use module to pick a module",
                    MODULE_DELIMITER
                ),
            )
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DroidTestError;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> StepConfig {
        StepConfig {
            project_location: temp.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let temp = TempDir::new().unwrap();
        assert!(validate_config(&config(&temp)).is_ok());
    }

    #[test]
    fn test_missing_project() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.project_location = temp.path().join("missing");

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, DroidTestError::Config(ConfigError::ProjectNotFound(_))));
    }

    #[test]
    fn test_invalid_patterns() {
        let temp = TempDir::new().unwrap();

        let mut empty = config(&temp);
        empty.report_path_pattern = " ".to_string();
        assert!(validate_config(&empty).is_err());

        let mut broken = config(&temp);
        broken.result_path_pattern = "*build/{test-results".to_string();
        assert!(matches!(
            validate_config(&broken).unwrap_err(),
            DroidTestError::Config(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_malformed_selectors() {
        let temp = TempDir::new().unwrap();

        let mut module = config(&temp);
        module.module = Some("app lib".to_string());
        assert!(validate_config(&module).is_err());

        let mut variant = config(&temp);
        variant.variant = Some("app:debug".to_string());
        assert!(validate_config(&variant).is_err());

        let mut nested = config(&temp);
        nested.module = Some("features:login".to_string());
        nested.variant = Some("demoDebug".to_string());
        assert!(validate_config(&nested).is_ok());
    }

    #[test]
    fn test_unbalanced_arguments() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.arguments = "-Pfoo='bar".to_string();

        assert!(matches!(
            validate_config(&config).unwrap_err(),
            DroidTestError::Config(ConfigError::InvalidArguments(_))
        ));
    }
}
