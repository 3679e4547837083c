// FILE: crates/storage/src/locator.rs

use crate::cache::PathCache;
use crate::error::{Result, StorageError};
use crate::indexer::{walk_files, BackgroundIndexer, SharedIndexer};
use crate::store::downloads_in_progress_dir;
use decant_config::SettingsHandle;
use decant_core::FileKind;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolves product identifiers to on-disk paths for one [`FileKind`].
///
/// Every lookup checks the shared [`PathCache`] first. On a miss, durable
/// kinds query the background inventory of the books directory and transient
/// kinds run a direct bounded scan of the downloads-in-progress directory;
/// either way a hit is written back into the cache before returning.
///
/// The match pattern anchors on the identifier followed by anything and one
/// of the kind's extensions, case-insensitive, against the full path string,
/// so the identifier may appear anywhere in the directory tree.
pub struct FileLocator {
    kind: FileKind,
    cache: Arc<PathCache>,
    settings: SettingsHandle,
    // Shared across every indexed kind: one live inventory per root
    indexer: SharedIndexer,
}

impl FileLocator {
    pub(crate) fn new(
        kind: FileKind,
        cache: Arc<PathCache>,
        settings: SettingsHandle,
        indexer: SharedIndexer,
    ) -> Self {
        Self {
            kind,
            cache,
            settings,
            indexer,
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Returns the canonical path for the product, or `None`.
    ///
    /// When several files match, the first in inventory enumeration order
    /// wins; use [`resolve_all`](Self::resolve_all) to see every match.
    pub async fn resolve(&self, product_id: &str) -> Result<Option<PathBuf>> {
        // Primary lookup
        if let Some(path) = self.cache.lookup(product_id, self.kind) {
            return Ok(Some(path));
        }

        // Secondary lookup
        let first = self.find_on_disk(product_id).await?.into_iter().next();
        if let Some(path) = &first {
            self.cache.insert(product_id, path.clone());
        }
        Ok(first)
    }

    /// Returns every matching path, for items split across multiple files.
    pub async fn resolve_all(&self, product_id: &str) -> Result<Vec<PathBuf>> {
        let found = self.find_on_disk(product_id).await?;
        if let Some(first) = found.first() {
            self.cache.insert(product_id, first.clone());
        }
        Ok(found)
    }

    /// Whether any file of this kind exists for the product
    pub async fn exists(&self, product_id: &str) -> Result<bool> {
        Ok(self.resolve(product_id).await?.is_some())
    }

    /// Forces a full re-scan of this kind's search root. A no-op for
    /// transient kinds, which scan on every lookup anyway.
    pub async fn refresh(&self) -> Result<()> {
        if self.kind.is_transient() {
            return Ok(());
        }
        self.indexer().await?.refresh().await
    }

    async fn find_on_disk(&self, product_id: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.search_pattern(product_id)?;
        if self.kind.is_transient() {
            self.scan_transient(pattern).await
        } else {
            Ok(self.indexer().await?.find_matches(&pattern))
        }
    }

    /// `(?i)<id>.*?\.(ext|ext)$` over the full path string
    fn search_pattern(&self, product_id: &str) -> Result<Regex> {
        let extensions = self.kind.extensions().join("|");
        let pattern = format!(
            r"(?i){}.*?\.({})$",
            regex::escape(product_id),
            extensions
        );
        Ok(Regex::new(&pattern)?)
    }

    /// Returns the live indexer for the current books directory, replacing a
    /// stale one if the user repointed the directory since the last query.
    async fn indexer(&self) -> Result<Arc<BackgroundIndexer>> {
        let books_dir = self.settings.books_dir();
        if books_dir.as_os_str().is_empty() {
            return Err(StorageError::Configuration(
                "books directory is not set".to_string(),
            ));
        }
        self.indexer.for_root(books_dir).await
    }

    /// Direct bounded scan for short-lived files that aren't worth indexing
    async fn scan_transient(&self, pattern: Regex) -> Result<Vec<PathBuf>> {
        let root = downloads_in_progress_dir(&self.settings)?;
        tokio::task::spawn_blocking(move || {
            walk_files(&root)
                .filter(|path| pattern.is_match(&path.to_string_lossy()))
                .collect()
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))
    }
}
