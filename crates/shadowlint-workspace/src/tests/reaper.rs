//! Unit tests for shadow tree removal.

use std::fs;
use std::os::unix::fs::symlink;
use std::sync::Barrier;
use std::thread;

use crate::tests::support::ModuleFixture;
use crate::{ShadowRoot, reap};

#[test]
fn removes_tree_but_keeps_link_targets() {
    let module = ModuleFixture::new();
    let external = module.write("external.go", "package keep\n");
    let external_dir = module.mkdir("external_dir");
    module.write("external_dir/inside.go", "package keep\n");

    let root = module.temp_area.join("shadow");
    fs::create_dir_all(root.join("empty")).expect("mkdir");
    fs::write(root.join("real.go"), "package gone\n").expect("write");
    symlink(&external, root.join("link.go")).expect("file link");
    symlink(&external_dir, root.join("dir_link")).expect("dir link");

    let report = reap(&root);

    assert!(report.is_clean(), "failures: {:?}", report.failures());
    assert_eq!(report.removed(), 5);
    assert!(!root.exists());
    assert_eq!(
        fs::read_to_string(&external).expect("external survives"),
        "package keep\n"
    );
    assert!(external_dir.join("inside.go").exists());
}

#[test]
fn missing_root_is_a_clean_no_op() {
    let module = ModuleFixture::new();
    let report = reap(&module.temp_area.join("never-created"));
    assert!(report.is_clean());
    assert_eq!(report.removed(), 0);
}

#[test]
fn dangling_links_are_unlinked() {
    let module = ModuleFixture::new();
    let root = module.temp_area.join("shadow");
    fs::create_dir_all(&root).expect("mkdir");
    symlink(module.path("vanished.go"), root.join("dangling.go")).expect("link");

    let report = reap(&root);
    assert!(report.is_clean());
    assert!(!root.exists());
}

#[test]
fn explicit_reap_reports_removal() {
    let module = ModuleFixture::new();
    let shadow = ShadowRoot::create_in(&module.temp_area).expect("create");
    fs::write(shadow.path().join("file.go"), "x").expect("write");
    let path = shadow.path().to_path_buf();

    let report = shadow.reap();
    assert!(report.is_clean());
    assert_eq!(report.removed(), 2);
    assert!(!path.exists());
}

#[test]
fn entries_removed_by_a_concurrent_reap_are_skipped() {
    let module = ModuleFixture::new();
    let external = module.write("external.go", "package keep\n");
    let root = module.temp_area.join("shadow");
    let mut entries = 1;
    for outer in 0..8 {
        for inner in 0..8 {
            let dir = root.join(format!("d{outer}/e{inner}"));
            fs::create_dir_all(&dir).expect("mkdir");
            fs::write(dir.join("file.go"), "x").expect("write");
            symlink(&external, dir.join("link.go")).expect("link");
            entries += 3;
        }
        entries += 1;
    }

    let barrier = Barrier::new(2);
    let reports = thread::scope(|scope| {
        let workers: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    reap(&root)
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("reaper thread"))
            .collect::<Vec<_>>()
    });

    for report in &reports {
        assert!(report.is_clean(), "failures: {:?}", report.failures());
    }
    let removed: usize = reports.iter().map(|report| report.removed()).sum();
    assert_eq!(removed, entries);
    assert!(!root.exists());
    assert!(external.exists());
}
