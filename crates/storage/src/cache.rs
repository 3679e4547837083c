// FILE: crates/storage/src/cache.rs

use decant_core::FileKind;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A known (product id, kind) → path association.
///
/// Only valid as long as the path exists on disk; staleness is tolerated
/// between writes and corrected at read time by [`PathCache::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub product_id: String,
    pub kind: FileKind,
    pub path: PathBuf,
}

impl CacheEntry {
    pub fn new(product_id: impl Into<String>, kind: FileKind, path: impl Into<PathBuf>) -> Self {
        Self {
            product_id: product_id.into(),
            kind,
            path: path.into(),
        }
    }
}

/// In-memory index from product identifier to known file paths.
///
/// Lives for the process lifetime; seeded lazily by successful lookups and by
/// discovery. Product identifiers are matched case-insensitively. Inserts are
/// last-write-wins and idempotent for identical (id, kind, path) triples.
/// `insert` never touches the filesystem; `lookup` performs exactly one
/// existence check per candidate and purges entries that check fails for, so
/// a stale path is never returned to the caller.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RwLock<HashMap<String, Vec<CacheEntry>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently inserted path for (product id, kind) that
    /// still exists on disk, dropping any stale entries found along the way.
    pub fn lookup(&self, product_id: &str, kind: FileKind) -> Option<PathBuf> {
        let key = Self::key(product_id);

        // Most recent first. Clone out of the lock so the existence checks
        // below don't hold it across filesystem calls.
        let candidates: Vec<PathBuf> = self
            .read()
            .get(&key)?
            .iter()
            .rev()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.path.clone())
            .collect();

        let mut hit = None;
        let mut stale = Vec::new();
        for path in candidates {
            if path.exists() {
                hit = Some(path);
                break;
            }
            stale.push(path);
        }

        if !stale.is_empty() {
            debug!(
                "Purging {} stale cache entr{} for {}",
                stale.len(),
                if stale.len() == 1 { "y" } else { "ies" },
                product_id
            );
            let mut entries = self.write();
            if let Some(list) = entries.get_mut(&key) {
                list.retain(|entry| !(entry.kind == kind && stale.contains(&entry.path)));
                if list.is_empty() {
                    entries.remove(&key);
                }
            }
        }

        hit
    }

    /// Caches a path for a product, deriving the kind from the extension.
    ///
    /// Returns false (and caches nothing) when the extension matches no
    /// known [`FileKind`].
    pub fn insert(&self, product_id: &str, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let Some(kind) = FileKind::from_path(&path) else {
            debug!("Not caching {}: unrecognized extension", path.display());
            return false;
        };
        self.insert_entry(CacheEntry::new(product_id, kind, path));
        true
    }

    /// Caches a fully specified entry (used by the discovery feed).
    pub fn insert_entry(&self, entry: CacheEntry) {
        let key = Self::key(&entry.product_id);
        let mut entries = self.write();
        let list = entries.entry(key).or_default();
        // Re-inserting an identical pair moves it to most-recent.
        list.retain(|existing| !(existing.kind == entry.kind && existing.path == entry.path));
        list.push(entry);
    }

    /// Number of products with at least one cached path
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn key(product_id: &str) -> String {
        product_id.to_lowercase()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<CacheEntry>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<CacheEntry>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
