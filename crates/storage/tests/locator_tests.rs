//! End-to-end resolution tests across cache, indexer, and locators

use decant_config::{Settings, SettingsHandle};
use decant_core::FileKind;
use decant_storage::{downloads_in_progress_dir, FileStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn settings_in(dir: &TempDir) -> SettingsHandle {
    SettingsHandle::new(Settings {
        books_dir: dir.path().join("Books"),
        in_progress_dir: dir.path().join("InProgress"),
    })
}

fn create_book_file(books_dir: &Path, relative: &str) -> PathBuf {
    let path = books_dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, vec![0u8; 2048]).unwrap();
    path
}

#[tokio::test]
async fn test_resolve_finds_nested_audio_file() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let expected = create_book_file(&settings.books_dir(), "sub/Asin123 - Title.m4b");

    let store = FileStore::new(settings);
    let audio = store.audio();
    audio.refresh().await.unwrap();

    let resolved = audio.resolve("Asin123").await.unwrap();
    assert_eq!(resolved, Some(expected.clone()));

    // The hit was written back: the cache alone answers now, no scan needed
    assert_eq!(
        store.cache().lookup("Asin123", FileKind::Audio),
        Some(expected)
    );
}

#[tokio::test]
async fn test_resolve_miss_leaves_cache_untouched() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    create_book_file(&settings.books_dir(), "Asin123 - Title.m4b");

    let store = FileStore::new(settings);
    store.audio().refresh().await.unwrap();

    assert_eq!(store.audio().resolve("XYZ").await.unwrap(), None);
    assert_eq!(store.cache().lookup("XYZ", FileKind::Audio), None);
}

#[tokio::test]
async fn test_resolve_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let expected = create_book_file(&settings.books_dir(), "asin123 - title.M4B");

    let store = FileStore::new(settings);
    store.audio().refresh().await.unwrap();

    let resolved = store.audio().resolve("ASIN123").await.unwrap();
    assert_eq!(resolved, Some(expected));
}

#[tokio::test]
async fn test_resolve_all_returns_every_match() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let part1 = create_book_file(&settings.books_dir(), "Tome42/Tome42 part1.m4b");
    let part2 = create_book_file(&settings.books_dir(), "Tome42/Tome42 part2.mp3");

    let store = FileStore::new(settings);
    store.audio().refresh().await.unwrap();

    let mut all = store.audio().resolve_all("Tome42").await.unwrap();
    all.sort();
    assert_eq!(all, vec![part1, part2]);
}

#[tokio::test]
async fn test_exists() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    create_book_file(&settings.books_dir(), "Asin123.m4b");

    let store = FileStore::new(settings);
    store.audio().refresh().await.unwrap();

    assert!(store.audio().exists("Asin123").await.unwrap());
    assert!(!store.audio().exists("Missing").await.unwrap());
}

#[tokio::test]
async fn test_root_swap_never_leaks_old_inventory() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    create_book_file(&settings.books_dir(), "Asin123.m4b");

    let store = FileStore::new(settings.clone());
    store.audio().refresh().await.unwrap();
    assert!(!store.audio().resolve_all("Asin123").await.unwrap().is_empty());

    // Repoint the books directory at an empty root
    let other_root = dir.path().join("OtherBooks");
    settings.set_books_dir(&other_root);
    store.audio().refresh().await.unwrap();

    let matches = store.audio().resolve_all("Asin123").await.unwrap();
    assert!(
        matches.is_empty(),
        "old root's inventory leaked through: {matches:?}"
    );
}

#[tokio::test]
async fn test_stale_cache_entry_recovers_via_rescan() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let original = create_book_file(&settings.books_dir(), "Asin123 - Title.m4b");

    let store = FileStore::new(settings.clone());
    store.audio().refresh().await.unwrap();
    assert_eq!(
        store.audio().resolve("Asin123").await.unwrap(),
        Some(original.clone())
    );

    // The file moves; the cached path is now stale
    fs::remove_file(&original).unwrap();
    let moved = create_book_file(&settings.books_dir(), "moved/Asin123 - Title.m4b");
    store.audio().refresh().await.unwrap();

    assert_eq!(store.audio().resolve("Asin123").await.unwrap(), Some(moved));
}

#[tokio::test]
async fn test_concurrent_resolves_converge() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let expected = create_book_file(&settings.books_dir(), "Asin123.m4b");

    let store = Arc::new(FileStore::new(settings));
    store.audio().refresh().await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.audio().resolve("Asin123").await.unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Some(expected.clone()));
    }
    assert_eq!(
        store.cache().lookup("Asin123", FileKind::Audio),
        Some(expected)
    );
}

#[tokio::test]
async fn test_transient_download_found_without_indexing() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let downloads = downloads_in_progress_dir(&settings).unwrap();
    let partial = downloads.join("Asin999.aaxc");
    fs::write(&partial, vec![0u8; 128]).unwrap();

    let store = FileStore::new(settings);
    // No refresh: transient lookups scan directly
    assert_eq!(
        store.download().resolve("Asin999").await.unwrap(),
        Some(partial)
    );
    assert_eq!(store.download().resolve("Asin000").await.unwrap(), None);
}

#[tokio::test]
async fn test_pdf_companion_resolution() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let expected = create_book_file(&settings.books_dir(), "Asin123/Asin123 extras.pdf");

    let store = FileStore::new(settings);
    store.pdf().refresh().await.unwrap();

    assert_eq!(store.pdf().resolve("Asin123").await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_audio_and_pdf_locators_share_one_inventory() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    create_book_file(&settings.books_dir(), "Asin123/Asin123 - Title.m4b");
    let companion = create_book_file(&settings.books_dir(), "Asin123/Asin123 extras.pdf");

    let store = FileStore::new(settings);
    // Only the audio locator refreshes. The pdf lookup must still see the
    // companion file, which it only can if both kinds query one inventory
    // of the books directory.
    store.audio().refresh().await.unwrap();

    assert_eq!(
        store.pdf().resolve("Asin123").await.unwrap(),
        Some(companion)
    );
}

#[tokio::test]
async fn test_unset_books_dir_is_configuration_error() {
    let settings = SettingsHandle::new(Settings {
        books_dir: PathBuf::new(),
        in_progress_dir: PathBuf::from("/tmp"),
    });

    let store = FileStore::new(settings);
    let result = store.audio().resolve("Asin123").await;
    assert!(matches!(
        result,
        Err(decant_storage::StorageError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_refresh_is_idempotent_over_unchanged_tree() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    create_book_file(&settings.books_dir(), "a/Asin1.m4b");
    create_book_file(&settings.books_dir(), "b/Asin1 bonus.mp3");

    let store = FileStore::new(settings);
    store.audio().refresh().await.unwrap();
    let mut before = store.audio().resolve_all("Asin1").await.unwrap();
    store.audio().refresh().await.unwrap();
    let mut after = store.audio().resolve_all("Asin1").await.unwrap();

    before.sort();
    after.sort();
    assert_eq!(before, after);
}
