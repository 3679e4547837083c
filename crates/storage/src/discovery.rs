// FILE: crates/storage/src/discovery.rs

use crate::cache::CacheEntry;
use crate::error::{Result, StorageError};
use crate::indexer::walk_files;
use decant_core::FileKind;
use lofty::file::TaggedFile;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::ItemValue;
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

const CHANNEL_BUFFER_SIZE: usize = 100;

/// A candidate file could not yield a product identifier
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable metadata: {0}")]
    Parse(String),
}

/// Extracts the embedded product identifier from a candidate file.
///
/// The discovery scan treats this as an opaque capability: it opens nothing
/// itself and only correlates whatever identifier comes back. `Ok(None)`
/// means the file was readable but carries no identifier.
pub trait MetadataReader: Send + Sync + 'static {
    fn read_product_id(&self, path: &Path) -> std::result::Result<Option<String>, MetadataError>;
}

/// [`MetadataReader`] backed by lofty tag parsing.
///
/// Liberated audiobooks carry their store identifier (ASIN) as a custom tag
/// item; anything exposing a tag key containing "asin" counts.
#[derive(Debug, Default)]
pub struct TagReader;

impl MetadataReader for TagReader {
    fn read_product_id(&self, path: &Path) -> std::result::Result<Option<String>, MetadataError> {
        let tagged_file = Probe::open(path)
            .map_err(|e| MetadataError::Parse(e.to_string()))?
            .read()
            .map_err(|e| MetadataError::Parse(e.to_string()))?;
        Ok(extract_product_id(&tagged_file))
    }
}

fn extract_product_id(tagged_file: &TaggedFile) -> Option<String> {
    for tag in tagged_file.tags() {
        for item in tag.items() {
            let ItemKey::Unknown(key) = item.key() else {
                continue;
            };
            if !key.to_lowercase().contains("asin") {
                continue;
            }
            if let ItemValue::Text(value) = item.value() {
                if !value.trim().is_empty() {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

/// Walks `search_dir` for audio files whose embedded identifier can be
/// extracted, yielding one [`CacheEntry`] per identified file.
///
/// The returned receiver is a lazy, finite sequence: candidates are processed
/// as the consumer drains the channel. The cancellation flag is checked
/// before each candidate; once set, the sequence stops yielding. A corrupt or
/// unreadable candidate is logged and skipped, never fatal. Each file handle
/// is scoped to the single candidate that opened it.
///
/// An inaccessible `search_dir` is the one error that propagates, before any
/// walking starts.
pub fn discover(
    search_dir: impl Into<PathBuf>,
    reader: Arc<dyn MetadataReader>,
    cancel: Arc<AtomicBool>,
) -> Result<mpsc::Receiver<CacheEntry>> {
    let search_dir = search_dir.into();
    if !search_dir.is_dir() {
        return Err(StorageError::Configuration(format!(
            "search directory {} does not exist",
            search_dir.display()
        )));
    }

    let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    tokio::task::spawn_blocking(move || {
        let mut yielded = 0usize;
        for path in walk_files(&search_dir) {
            if !FileKind::Audio.matches_path(&path) {
                continue;
            }

            if cancel.load(Ordering::Relaxed) {
                debug!("Discovery cancelled after {} files", yielded);
                break;
            }

            match reader.read_product_id(&path) {
                Ok(Some(product_id)) => {
                    let entry = CacheEntry::new(product_id, FileKind::Audio, path);
                    if tx.blocking_send(entry).is_err() {
                        // Consumer dropped the sequence
                        break;
                    }
                    yielded += 1;
                }
                Ok(None) => debug!("No product id embedded in {}", path.display()),
                Err(e) => error!("Error reading product id from {}: {}", path.display(), e),
            }
        }
        debug!(
            "Discovery of {} finished with {} files",
            search_dir.display(),
            yielded
        );
    });

    Ok(rx)
}
