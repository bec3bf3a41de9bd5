//! Settings shared by the shadowlint pipeline.
//!
//! The host editor hands each lint pass a [`Settings`] value describing the
//! module-root override, the lint trigger, and how to run the external tool.
//! Settings are plain TOML so they can be stored alongside editor
//! preferences:
//!
//! ```toml
//! gopath = "/home/me/go"
//! lint_mode = "background"
//! executable = "/usr/local/bin/gometalinter"
//! args = ["--fast", "--disable=gocyclo"]
//! timeout_secs = 20
//! ```

mod defaults;
mod error;
mod logging;
mod module_root;
mod trigger;

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

pub use defaults::{
    BUILD_CACHE_DIR, DEFAULT_EXECUTABLE, DEFAULT_LOG_FILTER, DEFAULT_TIMEOUT_SECS,
    GO_SOURCE_SUFFIX, HOME_MODULE_DIR, MODULE_ROOT_VAR, SHADOW_NAMESPACE, VENDOR_MARKER,
    default_args, default_executable, default_log_filter, default_log_filter_string,
    default_log_format, default_timeout_secs,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError};
pub use module_root::{ModuleRoot, ModuleRootSource};
pub use trigger::LintTrigger;

/// Per-view settings consumed by one lint invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    gopath: Option<Utf8PathBuf>,
    lint_mode: LintTrigger,
    #[serde(default = "default_executable")]
    executable: Utf8PathBuf,
    #[serde(default = "default_args")]
    args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gopath: None,
            lint_mode: LintTrigger::default(),
            executable: default_executable(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed text or unknown keys and
    /// [`ConfigError::InvalidTimeout`] when the timeout is zero.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()
    }

    /// Reads and parses a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Settings::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(self)
    }

    /// Sets the module-root override.
    #[must_use]
    pub fn with_gopath(mut self, gopath: impl Into<Utf8PathBuf>) -> Self {
        self.gopath = Some(gopath.into());
        self
    }

    /// Sets the lint trigger.
    #[must_use]
    pub const fn with_lint_mode(mut self, lint_mode: LintTrigger) -> Self {
        self.lint_mode = lint_mode;
        self
    }

    /// Sets the tool executable.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<Utf8PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Replaces the flags passed to the tool.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the tool timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, log_filter: impl Into<String>) -> Self {
        self.log_filter = log_filter.into();
        self
    }

    /// Module-root override, if configured.
    #[must_use]
    pub fn gopath(&self) -> Option<&Utf8Path> {
        self.gopath.as_deref()
    }

    /// Configured lint trigger.
    #[must_use]
    pub const fn lint_mode(&self) -> LintTrigger {
        self.lint_mode
    }

    /// Tool executable.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        self.executable.as_path()
    }

    /// Flags passed to the tool ahead of the package path.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Tool timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
