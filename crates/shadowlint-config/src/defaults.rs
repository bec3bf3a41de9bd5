//! Default values shared by the settings model and the lint pipeline.

use camino::Utf8PathBuf;

/// Environment variable the external tool uses to resolve imports.
pub const MODULE_ROOT_VAR: &str = "GOPATH";

/// Directory name marking bundled third-party sources.
pub const VENDOR_MARKER: &str = "vendor";

/// Build-cache directory shared between the real tree and its shadows.
pub const BUILD_CACHE_DIR: &str = "pkg";

/// Subdirectory of the temporary-files area reserved for shadow trees.
pub const SHADOW_NAMESPACE: &str = "shadowlint";

/// File extension of sources linked into flat temporary trees.
pub const GO_SOURCE_SUFFIX: &str = "go";

/// Directory appended to the home directory when no module root is configured.
pub const HOME_MODULE_DIR: &str = "go";

/// Default external linting executable.
pub const DEFAULT_EXECUTABLE: &str = "gometalinter";

/// Default upper bound on a single tool run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Default executable path, resolved through `PATH` when relative.
#[must_use]
pub fn default_executable() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_EXECUTABLE)
}

/// Flags passed to the tool ahead of the package path.
#[must_use]
pub fn default_args() -> Vec<String> {
    vec![String::from("--fast")]
}

/// Default tool timeout in seconds.
#[must_use]
pub const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
