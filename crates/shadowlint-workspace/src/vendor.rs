//! Detection of vendored-dependency directories.

use std::path::Path;

use shadowlint_config::VENDOR_MARKER;

/// Returns true when a directory on the chain from `package_dir` up to
/// `module_root` (both included) holds a `vendor` subdirectory.
///
/// Directories outside `module_root` are never inspected.
#[must_use]
pub fn has_vendor_marker(module_root: &Path, package_dir: &Path) -> bool {
    package_dir
        .ancestors()
        .take_while(|dir| dir.starts_with(module_root))
        .any(|dir| dir.join(VENDOR_MARKER).is_dir())
}
