//! Writes live buffer content into a shadow tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::ShadowError;
use crate::path_map::to_shadow;

const MATERIALIZE_TARGET: &str = "shadowlint_workspace::materialize";

/// Writes `content` for `target` at its mirrored location under
/// `shadow_root`.
///
/// # Errors
///
/// Returns [`ShadowError::PathOutsideRoot`] when `target` is not under
/// `module_root` and [`ShadowError::Materialize`] when a shadow ancestor of
/// the slot is not a real directory or the write fails.
pub fn materialize(
    shadow_root: &Path,
    module_root: &Path,
    target: &Path,
    content: &str,
) -> Result<PathBuf, ShadowError> {
    let slot = to_shadow(target, module_root, shadow_root)?;
    for ancestor in slot.ancestors().skip(1) {
        require_real_directory(&slot, ancestor)?;
        if ancestor == shadow_root {
            break;
        }
    }
    materialize_at(&slot, content)?;
    Ok(slot)
}

/// Writes `content` as a regular file at `slot`.
///
/// A link occupying the slot is removed first so the write can never reach
/// the file the link points at.
///
/// # Errors
///
/// Returns [`ShadowError::Materialize`] when the slot holds a directory, its
/// parent is not a real directory, or the write fails.
pub fn materialize_at(slot: &Path, content: &str) -> Result<(), ShadowError> {
    let failed = |source| ShadowError::Materialize {
        path: slot.to_path_buf(),
        source: Arc::new(source),
    };
    if let Some(parent) = slot.parent() {
        require_real_directory(slot, parent)?;
    }

    match fs::symlink_metadata(slot) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::remove_file(slot).map_err(failed)?;
        }
        Ok(metadata) if metadata.is_dir() => {
            return Err(failed(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a directory occupies the buffer slot",
            )));
        }
        Ok(_) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(failed(error)),
    }

    fs::write(slot, content).map_err(failed)?;
    debug!(
        target: MATERIALIZE_TARGET,
        slot = %slot.display(),
        bytes = content.len(),
        "materialised buffer"
    );
    Ok(())
}

/// Fails unless `dir` is a directory reached without following a link.
fn require_real_directory(slot: &Path, dir: &Path) -> Result<(), ShadowError> {
    let failed = |source| ShadowError::Materialize {
        path: slot.to_path_buf(),
        source: Arc::new(source),
    };
    match fs::symlink_metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(failed(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("shadow ancestor '{}' is not a real directory", dir.display()),
        ))),
        Err(error) => Err(failed(error)),
    }
}
