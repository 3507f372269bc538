//! Configuration file loading and validation.

use std::path::Path;

use ferry_common::is_valid_identifier;

use crate::error::ConfigError;
use crate::types::FerryConfig;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "ferry.toml";

/// Loads and validates `ferry.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<FerryConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `ferry.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<FerryConfig, ConfigError> {
    let config: FerryConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &FerryConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.modules.roots.is_empty() {
        return Err(ConfigError::MissingField("modules.roots".to_string()));
    }
    for (field, ext) in [
        ("modules.extension", &config.modules.extension),
        ("modules.declaration_extension", &config.modules.declaration_extension),
    ] {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be a bare extension like \"pyx\", got \"{ext}\""
            )));
        }
    }
    if config.modules.extension == config.modules.declaration_extension {
        return Err(ConfigError::ValidationError(
            "modules.extension and modules.declaration_extension must differ".to_string(),
        ));
    }
    if !is_valid_identifier(&config.modules.prefix) {
        return Err(ConfigError::ValidationError(format!(
            "modules.prefix \"{}\" is not a valid identifier",
            config.modules.prefix
        )));
    }
    if config.host.target.is_empty() {
        return Err(ConfigError::MissingField("host.target".to_string()));
    }
    if config.codegen.program.is_empty() {
        return Err(ConfigError::MissingField("codegen.program".to_string()));
    }
    Ok(())
}
