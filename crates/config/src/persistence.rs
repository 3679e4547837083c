//! File system persistence for settings
//!
//! Reads and writes the settings file with atomic writes (no partial or
//! corrupted files) and graceful fallbacks: a missing file yields defaults,
//! while an empty or unparseable file is reported as an error rather than
//! silently discarding the user's configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::settings::Settings;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Handles settings file persistence
pub struct SettingsPersistence {
    settings_path: PathBuf,
}

impl SettingsPersistence {
    /// Creates a persistence handler for the given settings file path
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Creates a persistence handler at the platform default location
    pub fn at_default_location() -> ConfigResult<Self> {
        let dirs = directories::ProjectDirs::from("app", "decant", "decant").ok_or(
            ConfigError::PathResolutionError {
                reason: "no home directory available".to_string(),
            },
        )?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE_NAME)))
    }

    /// Loads settings from file
    ///
    /// If the file doesn't exist, returns the default settings.
    /// If the file is empty or corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<Settings> {
        if !self.settings_path.exists() {
            log::info!(
                "Settings file not found at {}, using defaults",
                self.settings_path.display()
            );
            return Ok(Settings::default());
        }

        let contents =
            fs::read_to_string(&self.settings_path).map_err(|e| ConfigError::ReadError {
                path: self.settings_path.clone(),
                source: e,
            })?;

        // An empty file is treated as corrupted, not as valid defaults
        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.settings_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "settings file is empty or contains only whitespace",
                ),
            });
        }

        let settings: Settings =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: self.settings_path.clone(),
                source: e,
            })?;

        if let Err(e) = settings.validate() {
            log::warn!("Settings validation warning: {}", e);
        }

        Ok(settings)
    }

    /// Saves settings to file atomically
    ///
    /// Writes to a temporary file in the target directory and renames it
    /// into place so the settings file is never left half-written.
    pub fn save(&self, settings: &Settings) -> ConfigResult<()> {
        settings.validate()?;

        let parent = self
            .settings_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: format!(
                    "settings path {} has no parent directory",
                    self.settings_path.display()
                ),
            })?;
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let toml_string = toml::to_string_pretty(settings)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| ConfigError::WriteError {
            path: self.settings_path.clone(),
            source: e,
        })?;
        temp.write_all(toml_string.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: self.settings_path.clone(),
                source: e,
            })?;
        temp.persist(&self.settings_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.settings_path.clone(),
                source: e.error,
            })?;

        log::debug!("Settings saved to {}", self.settings_path.display());
        Ok(())
    }

    /// Path this handler reads and writes
    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let persistence = SettingsPersistence::new(dir.path().join("settings.toml"));
        let settings = persistence.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let persistence = SettingsPersistence::new(dir.path().join("settings.toml"));

        let settings = Settings {
            books_dir: PathBuf::from("/mnt/audiobooks"),
            in_progress_dir: PathBuf::from("/tmp/decant"),
        };
        persistence.save(&settings).unwrap();

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let persistence = SettingsPersistence::new(dir.path().join("nested/deeper/settings.toml"));
        persistence.save(&Settings::default()).unwrap();
        assert!(persistence.path().exists());
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "   \n").unwrap();

        let persistence = SettingsPersistence::new(path);
        assert!(matches!(
            persistence.load(),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "books_dir = [not toml").unwrap();

        let persistence = SettingsPersistence::new(path);
        assert!(matches!(
            persistence.load(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_save_rejects_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let persistence = SettingsPersistence::new(dir.path().join("settings.toml"));
        let settings = Settings {
            books_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(persistence.save(&settings).is_err());
        assert!(!persistence.path().exists());
    }
}
