//! File role classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The role a physical file plays for a catalog item.
///
/// Each kind carries its own extension set and scan strategy: durable kinds
/// are found through the background inventory of the books directory, while
/// transient kinds are short-lived and located by a direct scan of the
/// in-progress directory instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// Final decrypted audiobook audio
    Audio,
    /// Encrypted download still in progress (resumable)
    Download,
    /// Companion document shipped with some titles
    Pdf,
}

impl FileKind {
    /// Returns all kinds
    pub fn all() -> &'static [Self] {
        &[Self::Audio, Self::Download, Self::Pdf]
    }

    /// File extensions associated with this kind, lowercase, without dots
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Audio => &["m4b", "m4a", "mp3"],
            Self::Download => &["aax", "aaxc"],
            Self::Pdf => &["pdf", "zip"],
        }
    }

    /// Classifies a path by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    /// Whether a path carries one of this kind's extensions
    pub fn matches_path(&self, path: &Path) -> bool {
        FileKind::from_path(path) == Some(*self)
    }

    /// Transient kinds are never worth indexing persistently; they are
    /// located by a direct scan of their dedicated directory.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Download)
    }

    /// Returns the kind name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Download => "download",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
