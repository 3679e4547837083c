//! Settings for watched directories

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directories Decant operates on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root directory holding finished audiobooks and companion files
    pub books_dir: PathBuf,

    /// Root directory for in-progress downloads and decryptions
    pub in_progress_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let books_dir = directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join("Books"))
            .unwrap_or_else(|| PathBuf::from("Books"));

        let in_progress_dir = directories::ProjectDirs::from("app", "decant", "decant")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("InProgress"));

        Self {
            books_dir,
            in_progress_dir,
        }
    }
}

impl Settings {
    /// Checks that both directories are usable as scan roots.
    ///
    /// Existence is not required here; roots are created on first use. An
    /// empty path, however, can never become a meaningful scan root.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.books_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "books_dir must not be empty".to_string(),
            ));
        }
        if self.in_progress_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "in_progress_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
