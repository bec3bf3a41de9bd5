//! Ancestor-linked shadow trees.
//!
//! The builder walks from the target's package directory up to the module
//! root. Every directory on that chain becomes a real directory in the
//! shadow tree and every other entry becomes a link back into the real tree,
//! so imports resolve exactly as they would in place. The target's own entry
//! is left free for [`materialize`](crate::materialize).

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use shadowlint_config::BUILD_CACHE_DIR;

use crate::error::ShadowError;
use crate::link::symlink;
use crate::path_map::{relative_to, to_shadow};
use crate::root::ShadowRoot;

const BUILDER_TARGET: &str = "shadowlint_workspace::builder";

/// Builds ancestor-linked shadow trees for files under one module root.
///
/// ```rust,no_run
/// use std::path::Path;
/// use shadowlint_workspace::{ShadowTreeBuilder, materialize};
///
/// # fn main() -> Result<(), shadowlint_workspace::ShadowError> {
/// let module_root = Path::new("/home/u/go");
/// let target = Path::new("/home/u/go/src/example.com/svc/main.go");
/// let shadow = ShadowTreeBuilder::new(module_root).build(target)?;
/// materialize(shadow.path(), module_root, target, "package main\n")?;
/// let report = shadow.reap();
/// assert!(report.is_clean());
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct ShadowTreeBuilder {
    module_root: PathBuf,
    temp_area: PathBuf,
}

impl ShadowTreeBuilder {
    /// Creates a builder that places shadow roots in the process temporary
    /// area.
    #[must_use]
    pub fn new(module_root: impl Into<PathBuf>) -> Self {
        Self {
            module_root: module_root.into(),
            temp_area: env::temp_dir(),
        }
    }

    /// Places shadow roots below `temp_area` instead.
    #[must_use]
    pub fn with_temp_area(mut self, temp_area: impl Into<PathBuf>) -> Self {
        self.temp_area = temp_area.into();
        self
    }

    /// Module root the builder mirrors.
    #[must_use]
    pub fn module_root(&self) -> &Path {
        &self.module_root
    }

    /// Creates a shadow root mirroring the ancestor chain of `target`.
    ///
    /// On error the partially built root is reaped before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowError::PathOutsideRoot`] when `target` is not under the
    /// module root, [`ShadowError::LinkCreation`] when a link cannot be
    /// created, and the directory errors of [`ShadowError`] otherwise.
    pub fn build(&self, target: &Path) -> Result<ShadowRoot, ShadowError> {
        let module_root = self.module_root.as_path();
        let package_dir = target.parent().ok_or_else(|| ShadowError::MissingParent {
            path: target.to_path_buf(),
        })?;
        relative_to(package_dir, module_root)?;

        let root = ShadowRoot::create_in(&self.temp_area)?;

        let mut linked = 0_usize;
        for dir in package_dir.ancestors() {
            let shadow_dir = to_shadow(dir, module_root, root.path())?;
            ensure_directory(&shadow_dir)?;
            linked += mirror_entries(dir, &shadow_dir, target)?;
            if dir == module_root {
                break;
            }
        }
        // The ancestor walk runs first so a target under `pkg` keeps a real
        // directory there instead of the cache link.
        link_build_cache(module_root, root.path())?;

        debug!(
            target: BUILDER_TARGET,
            root = %root.path().display(),
            target_file = %target.display(),
            linked,
            "built shadow tree"
        );
        Ok(root)
    }
}

/// Links `<module_root>/pkg` into the shadow root when the cache exists.
fn link_build_cache(module_root: &Path, shadow_root: &Path) -> Result<(), ShadowError> {
    let cache = module_root.join(BUILD_CACHE_DIR);
    if !cache.is_dir() {
        return Ok(());
    }
    let link = shadow_root.join(BUILD_CACHE_DIR);
    upsert_link(&cache, &link, true).map(|_| ())
}

/// Creates `path` as a real directory, refusing a link in its place.
fn ensure_directory(path: &Path) -> Result<(), ShadowError> {
    let failed = |source| ShadowError::CreateDirectory {
        path: path.to_path_buf(),
        source: Arc::new(source),
    };
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(failed(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "a non-directory occupies an ancestor slot",
        ))),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(failed)
        }
        Err(error) => Err(failed(error)),
    }
}

/// Links every entry of `dir` except `skip` into `shadow_dir`.
fn mirror_entries(dir: &Path, shadow_dir: &Path, skip: &Path) -> Result<usize, ShadowError> {
    let read_error = |source| ShadowError::ReadDirectory {
        path: dir.to_path_buf(),
        source: Arc::new(source),
    };

    let mut linked = 0;
    for listed in fs::read_dir(dir).map_err(read_error)? {
        let entry = listed.map_err(read_error)?;
        let real = entry.path();
        if real == skip {
            continue;
        }
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        let link = shadow_dir.join(entry.file_name());
        if upsert_link(&real, &link, is_dir)? {
            linked += 1;
        }
    }
    Ok(linked)
}

/// Creates `link -> target`, treating an existing entry as already done.
///
/// Returns whether a new link was created.
pub(crate) fn upsert_link(target: &Path, link: &Path, is_dir: bool) -> Result<bool, ShadowError> {
    match symlink(target, link, is_dir) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
            note_existing(link);
            Ok(false)
        }
        Err(error) => Err(ShadowError::LinkCreation {
            link: link.to_path_buf(),
            target: target.to_path_buf(),
            source: Arc::new(error),
        }),
    }
}

fn note_existing(link: &Path) {
    match fs::symlink_metadata(link) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            trace!(target: BUILDER_TARGET, entry = %link.display(), "link already present");
        }
        // Ancestor directories are created before their parents are mirrored.
        Ok(metadata) if metadata.is_dir() => {
            trace!(target: BUILDER_TARGET, entry = %link.display(), "ancestor directory kept");
        }
        Ok(_) => {
            warn!(
                target: BUILDER_TARGET,
                entry = %link.display(),
                "existing shadow entry is not a link"
            );
        }
        Err(error) => {
            warn!(
                target: BUILDER_TARGET,
                entry = %link.display(),
                %error,
                "existing shadow entry could not be inspected"
            );
        }
    }
}
