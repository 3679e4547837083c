//! Shared, runtime-mutable settings handle

use crate::settings::Settings;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Clonable handle to the live settings.
///
/// Consumers re-read values through this handle on every operation rather
/// than caching them: the user may repoint the books directory at any time,
/// and the file-location layer detects that by comparing the current value
/// against whatever root its state was built for.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Current books directory
    pub fn books_dir(&self) -> PathBuf {
        self.read().books_dir.clone()
    }

    /// Current in-progress directory
    pub fn in_progress_dir(&self) -> PathBuf {
        self.read().in_progress_dir.clone()
    }

    /// Point the books directory somewhere else
    pub fn set_books_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        log::info!("Books directory changed to {}", path.display());
        self.write().books_dir = path;
    }

    /// Point the in-progress directory somewhere else
    pub fn set_in_progress_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        log::info!("In-progress directory changed to {}", path.display());
        self.write().in_progress_dir = path;
    }

    /// Copy of the full settings at this instant
    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    /// Replace the full settings
    pub fn replace(&self, settings: Settings) {
        *self.write() = settings;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Settings> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Settings> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
