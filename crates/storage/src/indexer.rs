// FILE: crates/storage/src/indexer.rs

use crate::error::{Result, StorageError};
use log::{debug, info, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::{watch, Mutex};
use walkdir::WalkDir;

/// How many newly discovered files accumulate before the initial scan
/// publishes an updated snapshot.
const PUBLISH_BATCH: usize = 256;

/// Point-in-time snapshot of every file path known under the root.
///
/// Swapped wholesale; readers holding an older snapshot keep a complete,
/// consistent view.
type Inventory = Arc<Vec<PathBuf>>;

/// Maintains an always-available (possibly slightly stale) inventory of
/// every file beneath a root directory, so pattern lookups are answered from
/// memory instead of a disk walk per call.
///
/// Construction spawns the initial scan and returns immediately; the
/// inventory fills in as the walk progresses. Queries issued before the walk
/// finishes see whatever has been discovered so far. Must be created inside
/// a tokio runtime.
#[derive(Debug)]
pub struct BackgroundIndexer {
    root: PathBuf,
    inventory: Arc<RwLock<Inventory>>,
    ready_rx: watch::Receiver<bool>,
    refresh_lock: Mutex<()>,
}

impl BackgroundIndexer {
    /// Creates an indexer rooted at `root` and starts the background scan.
    ///
    /// The root is created if absent. An empty or uncreatable root is a
    /// configuration error; everything below it that later turns out to be
    /// inaccessible is skipped and logged instead.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(StorageError::Configuration(
                "index root directory is not set".to_string(),
            ));
        }
        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::Configuration(format!(
                "cannot access index root {}: {}",
                root.display(),
                e
            ))
        })?;

        let inventory: Arc<RwLock<Inventory>> = Arc::new(RwLock::new(Arc::new(Vec::new())));
        let (ready_tx, ready_rx) = watch::channel(false);

        let scan_root = root.clone();
        let scan_inventory = inventory.clone();
        tokio::task::spawn_blocking(move || {
            let mut found = Vec::new();
            for path in walk_files(&scan_root) {
                found.push(path);
                if found.len() % PUBLISH_BATCH == 0 {
                    publish(&scan_inventory, found.clone());
                }
            }
            info!(
                "Indexed {} files under {}",
                found.len(),
                scan_root.display()
            );
            publish(&scan_inventory, found);
            let _ = ready_tx.send(true);
        });

        Ok(Self {
            root,
            inventory,
            ready_rx,
            refresh_lock: Mutex::new(()),
        })
    }

    /// The directory this indexer was built for
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filters the current inventory snapshot; never touches the disk.
    pub fn find_matches(&self, pattern: &Regex) -> Vec<PathBuf> {
        let snapshot = self.snapshot();
        snapshot
            .iter()
            .filter(|path| pattern.is_match(&path.to_string_lossy()))
            .cloned()
            .collect()
    }

    /// Number of paths in the current snapshot
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Waits until the initial scan has completed. Queries are valid before
    /// this resolves; they just see a partial inventory.
    pub async fn ready(&self) {
        let mut rx = self.ready_rx.clone();
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Re-walks the root and swaps in the new inventory once the walk
    /// completes. Readers keep seeing the old inventory until the swap.
    /// Concurrent refreshes are serialized.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        // Let the initial scan publish before racing a second full walk.
        self.ready().await;

        let root = self.root.clone();
        let found = tokio::task::spawn_blocking(move || walk_files(&root).collect::<Vec<_>>())
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?;

        debug!(
            "Refreshed index of {}: {} files",
            self.root.display(),
            found.len()
        );
        publish(&self.inventory, found);
        Ok(())
    }

    fn snapshot(&self) -> Inventory {
        self.inventory
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Hands out the single live [`BackgroundIndexer`] for the current root.
///
/// Exactly one inventory is live per distinct root directory: every locator
/// that indexes holds a clone of this handle, so concurrent callers asking
/// for the same root get the same indexer (and the same in-flight scan), and
/// a root change discards the old indexer and builds exactly one replacement
/// even when many callers notice the change simultaneously.
#[derive(Debug, Clone, Default)]
pub struct SharedIndexer {
    inner: Arc<Mutex<Option<Arc<BackgroundIndexer>>>>,
}

impl SharedIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live indexer for `root`, building one if none exists or
    /// if the previous one was rooted elsewhere. The check-and-swap runs
    /// under a single lock.
    pub async fn for_root(&self, root: PathBuf) -> Result<Arc<BackgroundIndexer>> {
        let mut guard = self.inner.lock().await;
        if let Some(indexer) = guard.as_ref() {
            if indexer.root() == root {
                return Ok(indexer.clone());
            }
            debug!(
                "Index root changed from {} to {}, rebuilding",
                indexer.root().display(),
                root.display()
            );
        }

        let indexer = Arc::new(BackgroundIndexer::new(root)?);
        *guard = Some(indexer.clone());
        Ok(indexer)
    }
}

fn publish(inventory: &Arc<RwLock<Inventory>>, paths: Vec<PathBuf>) {
    *inventory.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(paths);
}

/// Walks every file under `root`, skipping (and logging) entries that are
/// inaccessible or disappear mid-scan.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable entry during scan: {}", e);
                None
            }
        })
}
