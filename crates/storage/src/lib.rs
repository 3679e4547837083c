//! Decant file location and caching
//!
//! Maps catalog product identifiers to the physical files that back them,
//! without walking the filesystem on every lookup:
//!
//! - [`PathCache`] — in-memory (product id, kind) → path index, checked first
//!   on every lookup, validated lazily against the disk.
//! - [`BackgroundIndexer`] — background walk of the books directory that
//!   publishes an always-available inventory snapshot for pattern queries.
//! - [`FileLocator`] — per-[`FileKind`](decant_core::FileKind) resolution:
//!   cache, then inventory (or a direct scan for transient downloads), with
//!   cache write-back on success.
//! - [`discover`] — lazy, cancellable scan of an arbitrary directory for
//!   audiobooks not yet known to the catalog.
//! - [`FileStore`] — the facade wiring one cache and one locator per kind to
//!   a live settings handle. Construct one per process and inject it.

pub mod cache;
pub mod discovery;
pub mod error;
pub mod indexer;
pub mod locator;
pub mod store;

pub use cache::{CacheEntry, PathCache};
pub use discovery::{discover, MetadataError, MetadataReader, TagReader};
pub use error::{Result, StorageError};
pub use indexer::{BackgroundIndexer, SharedIndexer};
pub use locator::FileLocator;
pub use store::{
    clean_decrypt_leftovers, decrypt_in_progress_dir, downloads_in_progress_dir, FileStore,
};
