//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "droidtest.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "droidtest.yaml";

/// Pattern of the HTML report directories Gradle writes per module
pub const DEFAULT_REPORT_PATH_PATTERN: &str = "*build/reports/tests";

/// Pattern of the JUnit XML result directories Gradle writes per module
pub const DEFAULT_RESULT_PATH_PATTERN: &str = "*build/test-results";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".droidtest.toml",
        ".droidtest.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# droidtest configuration

project_location = "."
report_path_pattern = "*build/reports/tests"
result_path_pattern = "*build/test-results"

# Restrict the run to one module and/or one variant
# module = "app"
# variant = "debug"

# Extra Gradle arguments, split with shell quoting rules
arguments = ""

is_debug = false
"#;
