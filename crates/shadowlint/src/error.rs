//! Domain errors raised by a lint invocation.
//!
//! All errors use `thiserror`-derived enums with structured context. I/O
//! errors are wrapped in `Arc` to satisfy the `result_large_err` Clippy lint.
//! None of these errors reach the host editor: [`Linter::lint`] logs them and
//! reports "no diagnostics this run".
//!
//! [`Linter::lint`]: crate::Linter::lint

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shadowlint_workspace::ShadowError;
use thiserror::Error;

/// The external tool could not be run to completion.
#[derive(Debug, Clone, Error)]
pub enum ToolLaunchError {
    /// The process could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The merged output stream could not be created or read.
    #[error("failed to read output of '{program}': {source}")]
    Stream {
        /// Program whose output was read.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Waiting for the process failed.
    #[error("failed to wait for '{program}': {source}")]
    Wait {
        /// Program that was awaited.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The process outlived its timeout and was killed.
    #[error("'{program}' timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Program that was killed.
        program: PathBuf,
        /// Configured timeout.
        timeout: Duration,
    },

    /// The invocation was cancelled and the process killed.
    #[error("'{program}' was cancelled")]
    Cancelled {
        /// Program that was killed.
        program: PathBuf,
    },
}

/// Errors that end one lint invocation without results.
#[derive(Debug, Error)]
pub enum LintError {
    /// The target path was relative or had no file name.
    #[error("lint target '{path}' must be an absolute file path")]
    InvalidTarget {
        /// Offending path.
        path: PathBuf,
    },

    /// Building or populating the shadow tree failed.
    #[error(transparent)]
    Shadow(#[from] ShadowError),

    /// Running the external tool failed.
    #[error(transparent)]
    Tool(#[from] ToolLaunchError),
}
