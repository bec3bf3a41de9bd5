//! Lexical translation between the real module tree and a shadow tree.
//!
//! Both directions are pure: no filesystem access, no canonicalisation. A
//! path is inside a root when the root is a component-wise prefix and the
//! remainder contains only plain names, so `..` can never climb out.

use std::path::{Component, Path, PathBuf};

use crate::error::PathOutsideRootError;

/// Maps `real_path` under `module_root` to the same relative path under
/// `shadow_root`.
///
/// # Errors
///
/// Returns [`PathOutsideRootError`] when `real_path` is not a descendant of
/// (or equal to) `module_root`.
///
/// ```
/// use std::path::Path;
/// use shadowlint_workspace::to_shadow;
///
/// let shadow = to_shadow(
///     Path::new("/root/pkg/sub/file.go"),
///     Path::new("/root"),
///     Path::new("/tmp/shadow-1"),
/// )
/// .unwrap();
/// assert_eq!(shadow, Path::new("/tmp/shadow-1/pkg/sub/file.go"));
/// ```
pub fn to_shadow(
    real_path: &Path,
    module_root: &Path,
    shadow_root: &Path,
) -> Result<PathBuf, PathOutsideRootError> {
    rebase(real_path, module_root, shadow_root)
}

/// Maps `shadow_path` under `shadow_root` back to `module_root`.
///
/// # Errors
///
/// Returns [`PathOutsideRootError`] when `shadow_path` is not a descendant of
/// (or equal to) `shadow_root`.
pub fn to_real(
    shadow_path: &Path,
    module_root: &Path,
    shadow_root: &Path,
) -> Result<PathBuf, PathOutsideRootError> {
    rebase(shadow_path, shadow_root, module_root)
}

/// Returns the path of `path` relative to `root`.
///
/// # Errors
///
/// Returns [`PathOutsideRootError`] when `path` escapes `root`.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> Result<&'a Path, PathOutsideRootError> {
    let outside = || PathOutsideRootError {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let relative = path.strip_prefix(root).map_err(|_| outside())?;
    if relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
    {
        Ok(relative)
    } else {
        Err(outside())
    }
}

fn rebase(path: &Path, from: &Path, onto: &Path) -> Result<PathBuf, PathOutsideRootError> {
    let relative = relative_to(path, from)?;
    let mut rebased = onto.to_path_buf();
    rebased.extend(
        relative
            .components()
            .filter(|component| matches!(component, Component::Normal(_))),
    );
    Ok(rebased)
}

/// Pair of roots bound together for repeated translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    module_root: PathBuf,
    shadow_root: PathBuf,
}

impl PathMapper {
    /// Binds a module root to a shadow root.
    #[must_use]
    pub fn new(module_root: impl Into<PathBuf>, shadow_root: impl Into<PathBuf>) -> Self {
        Self {
            module_root: module_root.into(),
            shadow_root: shadow_root.into(),
        }
    }

    /// See [`to_shadow`].
    ///
    /// # Errors
    ///
    /// Returns [`PathOutsideRootError`] for paths outside the module root.
    pub fn to_shadow(&self, real_path: &Path) -> Result<PathBuf, PathOutsideRootError> {
        to_shadow(real_path, &self.module_root, &self.shadow_root)
    }

    /// See [`to_real`].
    ///
    /// # Errors
    ///
    /// Returns [`PathOutsideRootError`] for paths outside the shadow root.
    pub fn to_real(&self, shadow_path: &Path) -> Result<PathBuf, PathOutsideRootError> {
        to_real(shadow_path, &self.module_root, &self.shadow_root)
    }

    /// Real module root.
    #[must_use]
    pub fn module_root(&self) -> &Path {
        &self.module_root
    }

    /// Shadow root.
    #[must_use]
    pub fn shadow_root(&self) -> &Path {
        &self.shadow_root
    }
}
