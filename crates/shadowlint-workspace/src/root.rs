//! Ownership of a single, uniquely named shadow directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, warn};

use shadowlint_config::SHADOW_NAMESPACE;

use crate::error::ShadowError;
use crate::reaper::{ReapReport, reap};

const ROOT_TARGET: &str = "shadowlint_workspace::root";
const ROOT_PREFIX: &str = "shadow-";

/// A freshly created shadow directory owned by one lint invocation.
///
/// The directory lives under `<temp area>/shadowlint/` with a randomised
/// name, so concurrent invocations never share a root. Dropping a
/// `ShadowRoot` that was not reaped explicitly reaps it.
#[derive(Debug)]
pub struct ShadowRoot {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ShadowRoot {
    /// Creates a shadow root in the process temporary-files area.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowError::CreateRoot`] when the namespace directory or the
    /// root itself cannot be created.
    pub fn create() -> Result<Self, ShadowError> {
        Self::create_in(&env::temp_dir())
    }

    /// Creates a shadow root below `temp_area`.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowError::CreateRoot`] when the namespace directory or the
    /// root itself cannot be created.
    pub fn create_in(temp_area: &Path) -> Result<Self, ShadowError> {
        let namespace = temp_area.join(SHADOW_NAMESPACE);
        let create_error = |source| ShadowError::CreateRoot {
            path: namespace.clone(),
            source: Arc::new(source),
        };
        fs::create_dir_all(&namespace).map_err(create_error)?;
        let dir = tempfile::Builder::new()
            .prefix(ROOT_PREFIX)
            .tempdir_in(&namespace)
            .map_err(create_error)?;
        let path = dir.path().to_path_buf();
        debug!(target: ROOT_TARGET, root = %path.display(), "created shadow root");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Path of the shadow root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the shadow tree now and reports what happened.
    #[must_use = "reap failures should be inspected or logged"]
    pub fn reap(mut self) -> ReapReport {
        self.reap_now()
    }

    fn reap_now(&mut self) -> ReapReport {
        let report = reap(&self.path);
        // The tempfile guard only cleans up whatever the reaper left behind.
        drop(self.dir.take());
        report
    }
}

impl Drop for ShadowRoot {
    fn drop(&mut self) {
        if self.dir.is_none() {
            return;
        }
        let report = self.reap_now();
        if !report.is_clean() {
            warn!(
                target: ROOT_TARGET,
                root = %self.path.display(),
                failures = report.failures().len(),
                "shadow root was not fully removed"
            );
        }
    }
}
