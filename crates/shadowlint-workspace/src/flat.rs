//! Flat temporary trees for packages without ancestor import sensitivity.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use shadowlint_config::GO_SOURCE_SUFFIX;

use crate::error::ShadowError;
use crate::link::symlink;
use crate::root::ShadowRoot;

const FLAT_TARGET: &str = "shadowlint_workspace::flat";

/// Links a package's sibling sources flatly into a fresh shadow root.
#[derive(Debug, Clone)]
pub struct FlatTreeBuilder {
    temp_area: PathBuf,
}

impl Default for FlatTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatTreeBuilder {
    /// Creates a builder using the process temporary area.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp_area: env::temp_dir(),
        }
    }

    /// Places shadow roots below `temp_area` instead.
    #[must_use]
    pub fn with_temp_area(mut self, temp_area: impl Into<PathBuf>) -> Self {
        self.temp_area = temp_area.into();
        self
    }

    /// Creates a shadow root holding links to every `.go` file next to
    /// `target`, excluding `target` itself.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowError::MissingParent`], [`ShadowError::ReadDirectory`],
    /// or [`ShadowError::LinkCreation`]; the partial root is reaped first.
    pub fn build(&self, target: &Path) -> Result<ShadowRoot, ShadowError> {
        let package_dir = target.parent().ok_or_else(|| ShadowError::MissingParent {
            path: target.to_path_buf(),
        })?;
        let read_error = |source| ShadowError::ReadDirectory {
            path: package_dir.to_path_buf(),
            source: Arc::new(source),
        };

        let root = ShadowRoot::create_in(&self.temp_area)?;
        let mut linked = 0_usize;
        for entry in fs::read_dir(package_dir).map_err(read_error)? {
            let real = entry.map_err(read_error)?.path();
            if real == target || !is_go_source(&real) {
                continue;
            }
            let Some(name) = real.file_name() else {
                continue;
            };
            let link = root.path().join(name);
            match symlink(&real, &link, false) {
                Ok(()) => linked += 1,
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
                Err(error) => {
                    return Err(ShadowError::LinkCreation {
                        link,
                        target: real,
                        source: Arc::new(error),
                    });
                }
            }
        }

        debug!(
            target: FLAT_TARGET,
            root = %root.path().display(),
            package = %package_dir.display(),
            linked,
            "built flat shadow tree"
        );
        Ok(root)
    }
}

fn is_go_source(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(GO_SOURCE_SUFFIX)) && path.is_file()
}
