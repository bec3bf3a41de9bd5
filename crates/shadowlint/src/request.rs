//! Lint requests received from the host editor.

use std::fs;
use std::path::{Path, PathBuf};

/// One buffer the host wants linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintRequest {
    target: PathBuf,
    buffer: String,
    dirty: bool,
}

impl LintRequest {
    /// Creates a request with an explicit dirty flag.
    ///
    /// `target` is the absolute path of the file the buffer belongs to.
    #[must_use]
    pub fn new(target: impl Into<PathBuf>, buffer: impl Into<String>, dirty: bool) -> Self {
        Self {
            target: target.into(),
            buffer: buffer.into(),
            dirty,
        }
    }

    /// Creates a request, deciding dirtiness by comparing the buffer with the
    /// file on disk.
    ///
    /// A file that is missing or unreadable counts as dirty.
    #[must_use]
    pub fn detect_dirty(target: impl Into<PathBuf>, buffer: impl Into<String>) -> Self {
        let path = target.into();
        let content = buffer.into();
        let dirty = !fs::read(&path).is_ok_and(|on_disk| on_disk == content.as_bytes());
        Self::new(path, content, dirty)
    }

    /// Absolute path of the file being linted.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Live buffer content.
    #[must_use]
    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    /// Returns true when the buffer differs from the file on disk.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}
