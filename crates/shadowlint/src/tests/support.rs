//! Shared fixtures: a small Go module inside a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use shadowlint_config::{LintTrigger, ModuleRoot, Settings};
use tempfile::TempDir;

use crate::Linter;

/// Saved content of the target file.
pub const SAVED: &str = "package main\n\nfunc main() {}\n";

/// A module root holding `svc/main.go` and `svc/util.go`, plus a private
/// temporary area for shadow roots.
pub struct GoModule {
    temp_dir: TempDir,
    pub module_root: PathBuf,
    pub temp_area: PathBuf,
}

impl GoModule {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to allocate temporary directory");
        let module_root = temp_dir.path().join("root");
        let temp_area = temp_dir.path().join("tmp");
        fs::create_dir_all(&temp_area).expect("create temp area");
        let module = Self {
            temp_dir,
            module_root,
            temp_area,
        };
        module.write("svc/main.go", SAVED);
        module.write("svc/util.go", "package main\n\nfunc helper() {}\n");
        module.write("lib/lib.go", "package lib\n");
        module
    }

    /// Same layout with a `vendor` directory at the module root.
    pub fn vendored() -> Self {
        let module = Self::new();
        module.write("vendor/github.com/dep/dep.go", "package dep\n");
        module
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.module_root.join(relative)
    }

    pub fn target(&self) -> PathBuf {
        self.path("svc/main.go")
    }

    /// Directory for files owned by the test rather than the module.
    pub fn scratch(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write module file");
        path
    }

    /// Entries left in the shadow namespace of the temp area.
    pub fn leftover_shadow_roots(&self) -> Vec<PathBuf> {
        match fs::read_dir(self.temp_area.join("shadowlint")) {
            Ok(entries) => entries
                .map(|entry| entry.expect("read namespace entry").path())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Settings running `/bin/sh` with `script` as the tool.
    pub fn settings_for_script(&self, script: &Path, trigger: LintTrigger) -> Settings {
        Settings::default()
            .with_lint_mode(trigger)
            .with_executable("/bin/sh")
            .with_args([script.to_str().expect("script path is UTF-8")])
            .with_timeout_secs(10)
    }

    pub fn linter(&self, settings: Settings) -> Linter {
        let module_root = ModuleRoot::new(&self.module_root).expect("module root is absolute");
        Linter::with_module_root(settings, module_root).with_temp_area(&self.temp_area)
    }
}

pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink())
}

pub fn is_real_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_file())
}
