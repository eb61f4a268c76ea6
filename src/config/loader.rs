//! Config file loader and serialization.
//!
//! The format follows the file extension: `.json` or `.toml`.

use super::RunConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

/// Load config from a JSON or TOML file.
pub fn load_config_from_file(path: &Path) -> Result<RunConfig, ConfigError> {
    let format = validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config: RunConfig = match format {
        ConfigFormat::Json => serde_json::from_str(&content)?,
        ConfigFormat::Toml => toml::from_str(&content)?,
    };

    log::info!("[Config] Loaded run configuration from {}", path.display());
    Ok(config)
}

/// Save config to a JSON or TOML file.
pub fn save_config_to_file(config: &RunConfig, path: &Path) -> Result<(), ConfigError> {
    let format = validate_config_path(path)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = match format {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).map_err(ConfigError::JsonSerialize)?
        }
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
    };

    fs::write(path, content)?;
    Ok(())
}

/// Validate config path and derive its format from the extension.
pub fn validate_config_path(path: &Path) -> Result<ConfigFormat, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Configuration file must have .json or .toml extension, got .{}",
            ext
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Configuration file must have .json or .toml extension".to_string(),
        )),
    }
}
