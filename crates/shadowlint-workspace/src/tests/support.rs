//! Shared fixtures: a real module tree inside a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use shadowlint_config::SHADOW_NAMESPACE;
use tempfile::TempDir;

/// A module root and a private temporary area for shadow roots.
pub struct ModuleFixture {
    _temp_dir: TempDir,
    pub module_root: PathBuf,
    pub temp_area: PathBuf,
}

impl ModuleFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to allocate temporary directory");
        let module_root = temp_dir.path().join("root");
        let temp_area = temp_dir.path().join("tmp");
        fs::create_dir_all(&module_root).expect("create module root");
        fs::create_dir_all(&temp_area).expect("create temp area");
        Self {
            _temp_dir: temp_dir,
            module_root,
            temp_area,
        }
    }

    /// Standard layout with a target three directories below the root:
    ///
    /// ```text
    /// root/top.go
    /// root/pkg/cache.a
    /// root/a/sibling_dir/inner.go
    /// root/a/b/sib.go
    /// root/a/b/c/target.go
    /// root/a/b/c/other.go
    /// ```
    pub fn nested() -> Self {
        let fixture = Self::new();
        fixture.write("top.go", "package root\n");
        fixture.write("pkg/cache.a", "cache");
        fixture.write("a/sibling_dir/inner.go", "package sibling\n");
        fixture.write("a/b/sib.go", "package b\n");
        fixture.write("a/b/c/target.go", "package c\n");
        fixture.write("a/b/c/other.go", "package c\n");
        fixture
    }

    /// Replaces the temporary area with one whose path is `length` bytes
    /// long, so entries created near the bottom of a shadow root overflow the
    /// platform path limit.
    pub fn with_deep_temp_area(mut self, length: usize) -> Self {
        let mut deep = self.temp_area.clone();
        while deep.as_os_str().len() < length {
            let room = length - deep.as_os_str().len() - 1;
            deep.push("d".repeat(room.clamp(1, 200)));
        }
        fs::create_dir_all(&deep).unwrap_or_else(|error| panic!("mkdir deep area: {error}"));
        self.temp_area = deep;
        self
    }

    /// Shadow roots still present under the namespace directory.
    pub fn leftover_shadow_roots(&self) -> Vec<PathBuf> {
        let namespace = self.temp_area.join(SHADOW_NAMESPACE);
        match fs::read_dir(&namespace) {
            Ok(entries) => entries
                .map(|entry| entry.expect("namespace entry").path())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.module_root.join(relative)
    }

    pub fn target(&self) -> PathBuf {
        self.path("a/b/c/target.go")
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|error| panic!("failed to create {parent:?}: {error}"));
        }
        fs::write(&path, contents)
            .unwrap_or_else(|error| panic!("failed to write fixture {path:?}: {error}"));
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap_or_else(|error| panic!("mkdir {path:?}: {error}"));
        path
    }
}

pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink())
}

pub fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_dir())
}

pub fn is_real_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_file())
}
