//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read settings file
    #[error("Failed to read settings file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write settings file
    #[error("Failed to write settings file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse settings file
    #[error("Failed to parse settings file at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Settings contain invalid values
    #[error("Settings validation failed: {0}")]
    ValidationError(String),

    /// Settings directory path could not be determined
    #[error("Could not determine settings directory path: {reason}")]
    PathResolutionError { reason: String },
}
