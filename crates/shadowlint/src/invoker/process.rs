//! Process-based tool execution.
//!
//! [`ProcessRunner`] spawns the tool with standard output and standard error
//! redirected into one pipe, drains that pipe on a reader thread, and polls
//! the child until it exits, its timeout expires, or the run is cancelled.
//! The same deadline bounds the drain, since a grandchild can keep the pipe
//! open after the child itself is gone.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ToolLaunchError;
use crate::invoker::{CancellationToken, CapturedOutput, ToolInvocation, ToolRunner};

/// Tracing target for tool process operations.
const INVOKER_TARGET: &str = "shadowlint::invoker";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Minimum time allowed for the drain when the child exits near its deadline.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Runs the tool as a child process of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(
        &self,
        invocation: &ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, ToolLaunchError> {
        run_process(invocation, cancel)
    }
}

fn run_process(
    invocation: &ToolInvocation,
    cancel: &CancellationToken,
) -> Result<CapturedOutput, ToolLaunchError> {
    let program = invocation.program();
    let stream_error = |source| ToolLaunchError::Stream {
        program: program.to_path_buf(),
        source: Arc::new(source),
    };

    let (reader, writer) = io::pipe().map_err(stream_error)?;
    let error_writer = writer.try_clone().map_err(stream_error)?;

    let mut command = Command::new(program);
    command
        .args(invocation.args())
        .current_dir(invocation.working_dir())
        .envs(invocation.env())
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(error_writer);

    debug!(
        target: INVOKER_TARGET,
        program = %program.display(),
        args = ?invocation.args(),
        working_dir = %invocation.working_dir().display(),
        env = ?invocation.env(),
        "spawning tool process"
    );

    let spawned = command.spawn();
    // The command holds the parent's copies of the write end; the reader only
    // sees end-of-file once they are closed.
    drop(command);
    let mut child = spawned.map_err(|source| ToolLaunchError::Spawn {
        program: program.to_path_buf(),
        source: Arc::new(source),
    })?;

    let collector = collect_output(reader);
    let started = Instant::now();
    let status = wait_for_exit(&mut child, invocation, cancel)?;

    let drain_budget = invocation
        .timeout()
        .saturating_sub(started.elapsed())
        .max(DRAIN_GRACE);
    let bytes = await_output(collector, drain_budget, invocation, cancel)?
        .join()
        .map_err(|_| stream_error(io::Error::other("output reader panicked")))?
        .map_err(stream_error)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    debug!(
        target: INVOKER_TARGET,
        program = %program.display(),
        ?status,
        output_bytes = bytes.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "tool process exited"
    );
    Ok(CapturedOutput::new(text, status.code()))
}

/// Drains the merged stream so the child never blocks on a full pipe.
fn collect_output(mut reader: impl Read + Send + 'static) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

/// Waits up to `budget` for the reader to reach end-of-file.
///
/// On timeout or cancellation the reader thread is detached; it ends once the
/// last holder of the write end exits.
fn await_output(
    collector: JoinHandle<io::Result<Vec<u8>>>,
    budget: Duration,
    invocation: &ToolInvocation,
    cancel: &CancellationToken,
) -> Result<JoinHandle<io::Result<Vec<u8>>>, ToolLaunchError> {
    let program = invocation.program();
    let start = Instant::now();
    while !collector.is_finished() {
        if cancel.is_cancelled() {
            warn!(
                target: INVOKER_TARGET,
                program = %program.display(),
                "lint cancelled while draining tool output"
            );
            return Err(ToolLaunchError::Cancelled {
                program: program.to_path_buf(),
            });
        }
        if start.elapsed() > budget {
            warn!(
                target: INVOKER_TARGET,
                program = %program.display(),
                "tool output still open after exit, abandoning reader"
            );
            return Err(ToolLaunchError::Timeout {
                program: program.to_path_buf(),
                timeout: invocation.timeout(),
            });
        }
        thread::sleep(POLL_INTERVAL.min(budget));
    }
    Ok(collector)
}

/// Waits for the child to exit, killing it on timeout or cancellation.
fn wait_for_exit(
    child: &mut Child,
    invocation: &ToolInvocation,
    cancel: &CancellationToken,
) -> Result<ExitStatus, ToolLaunchError> {
    let program = invocation.program();
    let timeout = invocation.timeout();
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if cancel.is_cancelled() {
                    warn!(
                        target: INVOKER_TARGET,
                        program = %program.display(),
                        "lint cancelled, killing tool process"
                    );
                    terminate(child);
                    return Err(ToolLaunchError::Cancelled {
                        program: program.to_path_buf(),
                    });
                }
                if start.elapsed() > timeout {
                    warn!(
                        target: INVOKER_TARGET,
                        program = %program.display(),
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "tool timed out, killing process"
                    );
                    terminate(child);
                    return Err(ToolLaunchError::Timeout {
                        program: program.to_path_buf(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                terminate(child);
                return Err(ToolLaunchError::Wait {
                    program: program.to_path_buf(),
                    source: Arc::new(source),
                });
            }
        }
    }
}

// The reader thread is left to finish on its own: a grandchild may still
// hold the write end after the child is gone.
fn terminate(child: &mut Child) {
    drop(child.kill());
    drop(child.wait());
}
