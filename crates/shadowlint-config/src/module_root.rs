//! Resolves the root of the source tree the external tool expects.
//!
//! The root comes from the view settings when present, then from the
//! inherited `GOPATH`, and finally from `<home>/go`. A list-valued setting
//! contributes only its first non-empty segment.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Settings;
use crate::defaults::{HOME_MODULE_DIR, MODULE_ROOT_VAR};
use crate::error::ConfigError;

const CONFIG_TARGET: &str = "shadowlint_config::module_root";

/// Where a resolved module root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleRootSource {
    /// The per-view settings override.
    Settings,
    /// The inherited process environment.
    Environment,
    /// The conventional directory below the user's home.
    HomeDefault,
    /// Supplied directly by the caller through [`ModuleRoot::new`].
    Explicit,
}

/// Absolute path designating the module root for one lint invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRoot {
    path: PathBuf,
    source: ModuleRootSource,
}

impl ModuleRoot {
    /// Resolves the module root from explicit inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingModuleRoot`] when no input yields a path
    /// and [`ConfigError::RelativeModuleRoot`] when the chosen path is not
    /// absolute.
    pub fn resolve(
        settings_override: Option<&OsStr>,
        inherited: Option<&OsStr>,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let (path, source) = if let Some(path) = settings_override.and_then(first_segment) {
            (path, ModuleRootSource::Settings)
        } else if let Some(path) = inherited.and_then(first_segment) {
            (path, ModuleRootSource::Environment)
        } else if let Some(home_dir) = home {
            (home_dir.join(HOME_MODULE_DIR), ModuleRootSource::HomeDefault)
        } else {
            return Err(ConfigError::MissingModuleRoot);
        };

        if !path.is_absolute() {
            return Err(ConfigError::RelativeModuleRoot { path });
        }
        Ok(Self { path, source })
    }

    /// Resolves the module root from settings and the current process
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`ModuleRoot::resolve`].
    pub fn from_environment(settings: &Settings) -> Result<Self, ConfigError> {
        let inherited = env::var_os(MODULE_ROOT_VAR);
        let home = dirs::home_dir();
        let root = Self::resolve(
            settings.gopath().map(|path| path.as_os_str()),
            inherited.as_deref(),
            home.as_deref(),
        )?;
        debug!(
            target: CONFIG_TARGET,
            module_root = %root.path.display(),
            source = ?root.source,
            "resolved module root"
        );
        Ok(root)
    }

    /// Wraps an already validated absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativeModuleRoot`] when `path` is relative.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = path.into();
        if !root.is_absolute() {
            return Err(ConfigError::RelativeModuleRoot { path: root });
        }
        Ok(Self {
            path: root,
            source: ModuleRootSource::Explicit,
        })
    }

    /// Returns the root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Returns where the root came from.
    #[must_use]
    pub const fn source(&self) -> ModuleRootSource {
        self.source
    }
}

impl AsRef<Path> for ModuleRoot {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

fn first_segment(value: &OsStr) -> Option<PathBuf> {
    env::split_paths(value).find(|segment| !segment.as_os_str().is_empty())
}
