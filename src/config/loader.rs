// src/config/loader.rs
//! Configuration loading from TOML files.

use crate::config::MetConfig;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The file exists but is not valid TOML for [`MetConfig`].
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but the values are inconsistent.
    #[error("configuration validation error: {0}")]
    Validation(String),

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load and validate a [`MetConfig`] from a TOML file.
pub fn load_from_path(path: &Path) -> Result<MetConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let config: MetConfig = toml::from_str(&raw)?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}
