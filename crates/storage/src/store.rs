// FILE: crates/storage/src/store.rs

use crate::cache::{CacheEntry, PathCache};
use crate::error::{Result, StorageError};
use crate::indexer::SharedIndexer;
use crate::locator::FileLocator;
use decant_config::SettingsHandle;
use decant_core::FileKind;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Entry point to file location: one shared [`PathCache`] and one
/// [`FileLocator`] per kind, wired to a live settings handle.
///
/// Construct one per process and pass it around; nothing here is a hidden
/// global, so tests can build as many isolated stores as they like.
pub struct FileStore {
    cache: Arc<PathCache>,
    audio: FileLocator,
    download: FileLocator,
    pdf: FileLocator,
}

impl FileStore {
    pub fn new(settings: SettingsHandle) -> Self {
        let cache = Arc::new(PathCache::new());
        // One shared handle so audio and pdf lookups index the books
        // directory once, not once per kind.
        let indexer = SharedIndexer::new();
        Self {
            audio: FileLocator::new(
                FileKind::Audio,
                cache.clone(),
                settings.clone(),
                indexer.clone(),
            ),
            download: FileLocator::new(
                FileKind::Download,
                cache.clone(),
                settings.clone(),
                indexer.clone(),
            ),
            pdf: FileLocator::new(FileKind::Pdf, cache.clone(), settings, indexer),
            cache,
        }
    }

    /// Locator for a specific kind
    pub fn locator(&self, kind: FileKind) -> &FileLocator {
        match kind {
            FileKind::Audio => &self.audio,
            FileKind::Download => &self.download,
            FileKind::Pdf => &self.pdf,
        }
    }

    pub fn audio(&self) -> &FileLocator {
        &self.audio
    }

    pub fn download(&self) -> &FileLocator {
        &self.download
    }

    pub fn pdf(&self) -> &FileLocator {
        &self.pdf
    }

    /// The shared cache backing every locator
    pub fn cache(&self) -> &Arc<PathCache> {
        &self.cache
    }

    /// Feeds a discovery result into the cache so future lookups hit without
    /// scanning.
    pub fn import_discovered(&self, entry: CacheEntry) {
        self.cache.insert_entry(entry);
    }
}

/// Directory holding resumable in-progress downloads, created on demand
pub fn downloads_in_progress_dir(settings: &SettingsHandle) -> Result<PathBuf> {
    in_progress_subdir(settings, "DownloadsInProgress")
}

/// Directory holding partially decrypted output, created on demand
pub fn decrypt_in_progress_dir(settings: &SettingsHandle) -> Result<PathBuf> {
    in_progress_subdir(settings, "DecryptInProgress")
}

fn in_progress_subdir(settings: &SettingsHandle, name: &str) -> Result<PathBuf> {
    let root = settings.in_progress_dir();
    if root.as_os_str().is_empty() {
        return Err(StorageError::Configuration(
            "in-progress directory is not set".to_string(),
        ));
    }
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).map_err(|e| {
        StorageError::Configuration(format!(
            "cannot access in-progress directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    Ok(dir)
}

/// Deletes files left behind by an interrupted decryption.
///
/// Run once at startup. Files under `DownloadsInProgress` are resumable and
/// deliberately left alone. Returns the number of files removed; individual
/// delete failures are logged and skipped.
pub fn clean_decrypt_leftovers(settings: &SettingsHandle) -> Result<usize> {
    let dir = decrypt_in_progress_dir(settings)?;
    let mut removed = 0;
    for entry in std::fs::read_dir(&dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Could not remove leftover {}: {}", path.display(), e),
        }
    }
    if removed > 0 {
        info!("Removed {} partially decrypted leftover files", removed);
    }
    Ok(removed)
}
