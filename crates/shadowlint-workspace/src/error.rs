//! Domain errors raised while building or tearing down shadow trees.
//!
//! I/O errors are wrapped in `Arc` to keep the error enums small enough for
//! the `result_large_err` lint and to let callers clone them into reports.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// A path manipulation left the declared root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path '{path}' is not inside '{root}'")]
pub struct PathOutsideRootError {
    /// Path that was translated.
    pub path: PathBuf,
    /// Root the path was expected to live under.
    pub root: PathBuf,
}

/// Errors that abort construction of a shadow tree.
#[derive(Debug, Error)]
pub enum ShadowError {
    /// A path could not be mapped between the real and the shadow tree.
    #[error(transparent)]
    PathOutsideRoot(#[from] PathOutsideRootError),

    /// The uniquely named shadow root could not be created.
    #[error("failed to create shadow root under '{path}': {source}")]
    CreateRoot {
        /// Namespace directory the root was created in.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A real directory inside the shadow tree could not be created.
    #[error("failed to create shadow directory '{path}': {source}")]
    CreateDirectory {
        /// Directory that was created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A directory of the real tree could not be listed.
    #[error("failed to list '{path}': {source}")]
    ReadDirectory {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A symbolic link could not be created.
    #[error("failed to link '{link}' to '{target}': {source}")]
    LinkCreation {
        /// Link path inside the shadow tree.
        link: PathBuf,
        /// Real path the link points at.
        target: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The buffer content could not be written into the shadow tree.
    #[error("failed to materialise buffer at '{path}': {source}")]
    Materialize {
        /// Destination inside the shadow tree.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The target file has no parent directory.
    #[error("target '{path}' has no parent directory")]
    MissingParent {
        /// Offending target path.
        path: PathBuf,
    },
}

/// Failure to remove one entry of a shadow tree.
///
/// Reap errors are recorded and logged; they never abort the traversal.
#[derive(Debug, Clone, Error)]
#[error("failed to remove shadow entry '{path}': {source}")]
pub struct ReapError {
    /// Entry that could not be removed.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: Arc<io::Error>,
}
