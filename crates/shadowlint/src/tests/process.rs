//! Tests for the process-based tool runner.

use std::env;
use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use rstest::rstest;
use tempfile::TempDir;

use crate::{CancellationToken, ProcessRunner, ToolInvocation, ToolLaunchError, ToolRunner};

fn shell(script: &str, working_dir: &std::path::Path) -> ToolInvocation {
    ToolInvocation::new("/bin/sh", working_dir).with_args(["-c", script])
}

fn scratch() -> TempDir {
    TempDir::new().expect("failed to allocate temporary directory")
}

#[rstest]
fn merges_stdout_and_stderr() {
    let dir = scratch();
    let invocation = shell("echo out; echo err 1>&2; echo again", dir.path());
    let output = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect("tool should run");
    let mut lines: Vec<&str> = output.text().lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["again", "err", "out"]);
    assert_eq!(output.exit_code(), Some(0));
}

#[rstest]
fn non_zero_exit_is_reported_not_raised() {
    let dir = scratch();
    let invocation = shell("echo 'main.go:1::warning: w'; exit 3", dir.path());
    let output = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect("non-zero exit is not a launch failure");
    assert_eq!(output.exit_code(), Some(3));
    assert_eq!(output.text(), "main.go:1::warning: w\n");
}

#[rstest]
fn child_sees_working_directory_and_environment_overrides() {
    let dir = scratch();
    let invocation = shell(r#"printf '%s|%s' "$GOPATH" "$(pwd -P)""#, dir.path())
        .with_env("GOPATH", "/home/u/shadow");
    let output = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect("tool should run");
    let physical = fs::canonicalize(dir.path()).expect("canonicalise scratch dir");
    assert_eq!(
        output.text(),
        format!("/home/u/shadow|{}", physical.display())
    );
}

#[rstest]
fn parent_environment_is_not_mutated() {
    let dir = scratch();
    let invocation = shell("true", dir.path()).with_env("SHADOWLINT_PROCESS_TEST_VAR", "set");
    ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect("tool should run");
    assert!(env::var_os("SHADOWLINT_PROCESS_TEST_VAR").is_none());
}

#[rstest]
fn drains_output_larger_than_a_pipe_buffer() {
    let dir = scratch();
    let invocation = shell("i=0; while [ $i -lt 20000 ]; do echo line$i; i=$((i+1)); done", dir.path());
    let output = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect("tool should run");
    assert_eq!(output.text().lines().count(), 20_000);
}

#[rstest]
fn kills_tool_after_timeout() {
    let dir = scratch();
    let invocation = shell("sleep 5", dir.path()).with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let error = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect_err("tool should time out");
    assert!(matches!(error, ToolLaunchError::Timeout { timeout, .. } if timeout == Duration::from_millis(200)));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[rstest]
fn background_grandchild_holding_output_cannot_outlast_timeout() {
    let dir = scratch();
    let invocation = shell("(sleep 5 &); echo started", dir.path())
        .with_timeout(Duration::from_millis(300));
    let started = Instant::now();
    let error = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect_err("drain should be bounded");
    assert!(matches!(error, ToolLaunchError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[rstest]
fn pre_cancelled_token_kills_tool() {
    let dir = scratch();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let error = ProcessRunner
        .run(&shell("sleep 5", dir.path()), &cancel)
        .expect_err("tool should be cancelled");
    assert!(matches!(error, ToolLaunchError::Cancelled { .. }));
}

#[rstest]
fn cancellation_from_another_thread_stops_the_run() {
    let dir = scratch();
    let cancel = CancellationToken::new();
    let remote = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        remote.cancel();
    });
    let started = Instant::now();
    let error = ProcessRunner
        .run(&shell("sleep 5", dir.path()), &cancel)
        .expect_err("tool should be cancelled");
    canceller.join().expect("canceller thread");
    assert!(matches!(error, ToolLaunchError::Cancelled { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[rstest]
fn missing_program_is_a_spawn_error() {
    let dir = scratch();
    let invocation = ToolInvocation::new("/nonexistent/shadowlint-tool", dir.path());
    let error = ProcessRunner
        .run(&invocation, &CancellationToken::new())
        .expect_err("spawn should fail");
    assert!(matches!(error, ToolLaunchError::Spawn { .. }));
    assert!(error.to_string().contains("/nonexistent/shadowlint-tool"));
}
