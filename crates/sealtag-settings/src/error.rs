//! Error types for the settings crate.
//!
//! Structured errors for loading, saving and validating configuration.

use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be loaded.
    #[error("Failed to load settings from {path}: {reason}")]
    LoadError { path: String, reason: String },

    /// The configuration file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// A configuration validation error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is out of valid range.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// The engraving plane axes do not span a usable frame.
    #[error("Invalid engrave plane: {0}")]
    InvalidPlane(String),

    /// No platform configuration directory could be resolved.
    #[error("Config directory unavailable")]
    NoConfigDirectory,
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &str, value: impl ToString) -> Self {
        ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
