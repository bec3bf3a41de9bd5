//! Errors raised while loading settings or resolving the module root.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings text is not valid TOML or does not match the model.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured tool timeout was zero.
    #[error("tool timeout must be at least one second")]
    InvalidTimeout,

    /// Neither the settings, the environment nor the home directory yielded a
    /// module root.
    #[error("no module root configured and no home directory available")]
    MissingModuleRoot,

    /// The resolved module root is not an absolute path.
    #[error("module root '{path}' must be an absolute path")]
    RelativeModuleRoot {
        /// Offending path.
        path: PathBuf,
    },
}
