//! Delivery destination resolution.
//!
//! A persisted override file, when present and non-empty, wins over the
//! configured default. The file is read on every call, so a `/setchat`
//! takes effect on the next send without a restart.

use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolves where notifications are delivered.
pub trait DestinationResolver: Send + Sync {
    /// Current destination, or `None` if nothing is configured.
    fn resolve(&self) -> Option<String>;
}

/// Destination backed by a plain-text override file and an optional default.
#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
    default: Option<String>,
}

impl FileDestination {
    pub const DEFAULT_PATH: &'static str = "chat_id.txt";

    pub fn new(path: impl Into<PathBuf>, default: Option<String>) -> Self {
        Self {
            path: path.into(),
            default: default.filter(|d| !d.trim().is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the override file. Missing, empty and unreadable all yield `None`.
    pub fn read_override(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read destination override");
                None
            }
        }
    }

    /// Overwrite the override file with `chat_id`.
    pub fn persist(&self, chat_id: &str) -> io::Result<()> {
        std::fs::write(&self.path, chat_id)
    }
}

impl DestinationResolver for FileDestination {
    fn resolve(&self) -> Option<String> {
        self.read_override().or_else(|| self.default.clone())
    }
}
