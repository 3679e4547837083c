// FILE: crates/storage/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The configured root directory is unset, invalid, or inaccessible.
    /// This is the one failure class that propagates to callers; per-item
    /// scan failures are logged and skipped instead.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Scan task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
