//! Post-order removal of shadow trees that never follows links.
//!
//! Links are unlinked in place so their targets in the real module tree
//! survive. Entries that vanish mid-traversal are skipped, and any other
//! failure is recorded in the [`ReapReport`] before the walk moves on.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ReapError;

const REAPER_TARGET: &str = "shadowlint_workspace::reaper";

/// Outcome of a reap.
#[derive(Debug, Default)]
pub struct ReapReport {
    removed: usize,
    failures: Vec<ReapError>,
}

impl ReapReport {
    /// Number of entries removed, the root included.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.removed
    }

    /// Entries that could not be removed.
    #[must_use]
    pub fn failures(&self) -> &[ReapError] {
        &self.failures
    }

    /// Returns true when every entry was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, source: io::Error) {
        let error = ReapError {
            path: path.to_path_buf(),
            source: Arc::new(source),
        };
        warn!(target: REAPER_TARGET, %error, "skipping shadow entry");
        self.failures.push(error);
    }

    fn removed_one(&mut self, outcome: io::Result<()>, path: &Path) {
        match outcome {
            Ok(()) => self.removed += 1,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => self.record(path, error),
        }
    }
}

/// Removes `root` and everything beneath it.
///
/// A missing root is not an error. The returned report lists the entries
/// that could not be removed; the caller decides whether to log them.
pub fn reap(root: &Path) -> ReapReport {
    let mut report = ReapReport::default();
    remove_entry(root, &mut report);
    debug!(
        target: REAPER_TARGET,
        root = %root.display(),
        removed = report.removed,
        failures = report.failures.len(),
        "reaped shadow tree"
    );
    report
}

fn remove_entry(path: &Path, report: &mut ReapReport) {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return,
        Err(error) => {
            report.record(path, error);
            return;
        }
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        report.removed_one(unlink(path), path);
    } else if file_type.is_dir() {
        remove_directory(path, report);
    } else {
        report.removed_one(fs::remove_file(path), path);
    }
}

fn remove_directory(dir: &Path, report: &mut ReapReport) {
    match fs::read_dir(dir) {
        Ok(entries) => {
            for listed in entries {
                match listed {
                    Ok(entry) => remove_entry(&entry.path(), report),
                    Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                    Err(error) => report.record(dir, error),
                }
            }
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => return,
        Err(error) => report.record(dir, error),
    }
    report.removed_one(fs::remove_dir(dir), dir);
}

#[cfg(unix)]
fn unlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks on Windows are removed like directories.
#[cfg(windows)]
fn unlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}
