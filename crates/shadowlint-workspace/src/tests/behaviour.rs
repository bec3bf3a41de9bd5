//! Behavioural tests for the shadow tree lifecycle using `rstest-bdd`.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::tests::support::{ModuleFixture, is_real_file, is_symlink};
use crate::{ReapReport, ShadowRoot, ShadowTreeBuilder, materialize};

struct ShadowWorld {
    module: ModuleFixture,
    shadow: Option<ShadowRoot>,
    shadow_path: Option<PathBuf>,
    slot: Option<PathBuf>,
    buffer: String,
    report: Option<ReapReport>,
}

impl ShadowWorld {
    fn new() -> Self {
        Self {
            module: ModuleFixture::new(),
            shadow: None,
            shadow_path: None,
            slot: None,
            buffer: String::new(),
            report: None,
        }
    }

    fn shadow_path(&self) -> PathBuf {
        self.shadow_path.clone().expect("shadow tree not built")
    }
}

#[fixture]
fn world() -> RefCell<ShadowWorld> {
    RefCell::new(ShadowWorld::new())
}

#[given("a module root with a target three directories deep")]
fn given_module(world: &RefCell<ShadowWorld>) {
    world.borrow_mut().module = ModuleFixture::nested();
}

#[when("the shadow tree is built for the target")]
fn when_built(world: &RefCell<ShadowWorld>) {
    let mut world = world.borrow_mut();
    let shadow = ShadowTreeBuilder::new(&world.module.module_root)
        .with_temp_area(&world.module.temp_area)
        .build(&world.module.target())
        .expect("shadow tree builds");
    world.shadow_path = Some(shadow.path().to_path_buf());
    world.shadow = Some(shadow);
}

#[when("the buffer {content} is materialised")]
fn when_materialised(world: &RefCell<ShadowWorld>, content: String) {
    let mut world = world.borrow_mut();
    let buffer = format!("{}\n", content.trim_matches('"'));
    let slot = materialize(
        &world.shadow_path(),
        &world.module.module_root,
        &world.module.target(),
        &buffer,
    )
    .expect("buffer materialises");
    world.slot = Some(slot);
    world.buffer = buffer;
}

#[then("every sibling of the target and its ancestors is linked")]
fn then_siblings_linked(world: &RefCell<ShadowWorld>) {
    let world = world.borrow();
    let shadow = world.shadow_path();
    for relative in ["a/b/c/other.go", "a/b/sib.go", "a/sibling_dir", "top.go", "pkg"] {
        assert!(
            is_symlink(&shadow.join(relative)),
            "{relative} should be linked"
        );
    }
}

#[then("the target slot holds the buffer as a regular file")]
fn then_slot_holds_buffer(world: &RefCell<ShadowWorld>) {
    let world = world.borrow();
    let slot = world.slot.as_ref().expect("buffer not materialised");
    assert!(is_real_file(slot));
    assert_eq!(fs::read_to_string(slot).expect("read slot"), world.buffer);
}

#[when("the shadow tree is reaped")]
fn when_reaped(world: &RefCell<ShadowWorld>) {
    let mut world = world.borrow_mut();
    let shadow = world.shadow.take().expect("shadow tree not built");
    world.report = Some(shadow.reap());
}

#[then("the shadow root no longer exists")]
fn then_root_gone(world: &RefCell<ShadowWorld>) {
    let world = world.borrow();
    let report = world.report.as_ref().expect("tree not reaped");
    assert!(report.is_clean(), "failures: {:?}", report.failures());
    assert!(!world.shadow_path().exists());
}

#[then("the real module tree is untouched")]
fn then_real_tree_untouched(world: &RefCell<ShadowWorld>) {
    let world = world.borrow();
    let module = &world.module;
    assert_eq!(
        fs::read_to_string(module.target()).expect("read target"),
        "package c\n"
    );
    for relative in ["top.go", "pkg/cache.a", "a/sibling_dir/inner.go", "a/b/sib.go", "a/b/c/other.go"] {
        assert!(module.path(relative).exists(), "{relative} should survive");
    }
}

#[scenario(path = "tests/features/shadow_lifecycle.feature")]
fn shadow_lifecycle_behaviour(world: RefCell<ShadowWorld>) {
    let _ = world;
}
