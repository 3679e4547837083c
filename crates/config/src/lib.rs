//! Decant configuration
//!
//! Typed settings for the directories Decant watches, with TOML persistence
//! and a shared handle that other layers poll at query time. The watched
//! directories may change while the application is running; consumers must
//! never cache them past a single operation.
//!
//! # Example
//!
//! ```rust
//! use decant_config::{Settings, SettingsHandle};
//!
//! let handle = SettingsHandle::new(Settings::default());
//! let books = handle.books_dir();
//! handle.set_books_dir("/mnt/audiobooks");
//! assert_ne!(books, handle.books_dir());
//! ```

mod error;
mod handle;
mod persistence;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use handle::SettingsHandle;
pub use persistence::SettingsPersistence;
pub use settings::Settings;
