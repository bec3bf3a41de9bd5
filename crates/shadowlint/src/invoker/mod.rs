//! Invocation of the external linting tool.
//!
//! A [`ToolInvocation`] fully describes one run: program, arguments, working
//! directory, environment overrides, and timeout. Nothing about the parent
//! process is mutated to scope a run; the working directory and environment
//! are applied to the child alone.
//!
//! The [`ToolRunner`] abstraction enables test doubles that return
//! pre-configured output without spawning real processes.

mod process;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::ToolLaunchError;

pub use self::process::ProcessRunner;

/// Complete description of one external tool run.
///
/// ```
/// use std::time::Duration;
/// use shadowlint::ToolInvocation;
///
/// let invocation = ToolInvocation::new("/usr/local/bin/gometalinter", "/tmp/work")
///     .with_args(["--fast", "."])
///     .with_env("GOPATH", "/tmp/shadowlint/shadow-abc")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(invocation.args().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: PathBuf,
    env: BTreeMap<String, OsString>,
    timeout: Duration,
}

impl ToolInvocation {
    /// Default timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates an invocation of `program` inside `working_dir`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Overrides one environment variable for the child.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets the timeout after which the child is killed.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program to run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory of the child.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Environment overrides applied on top of the inherited environment.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, OsString> {
        &self.env
    }

    /// Timeout after which the child is killed.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Combined standard output and standard error of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturedOutput {
    text: String,
    exit_code: Option<i32>,
}

impl CapturedOutput {
    /// Creates captured output.
    #[must_use]
    pub fn new(text: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            text: text.into(),
            exit_code,
        }
    }

    /// Merged output text, decoded lossily as UTF-8.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Exit code, absent when the child was ended by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

/// Shared flag used to abandon an in-flight run.
///
/// Cloning the token shares the flag, so the host can keep one clone and
/// hand the other to a lint pass that may need cancelling.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Trait abstracting tool execution for testability.
///
/// The production implementation is [`ProcessRunner`]. A non-zero exit status
/// is not an error: linters exit non-zero when they report problems.
///
/// # Example
///
/// ```
/// use shadowlint::{CancellationToken, CapturedOutput, ToolInvocation, ToolLaunchError, ToolRunner};
///
/// struct CannedRunner;
///
/// impl ToolRunner for CannedRunner {
///     fn run(
///         &self,
///         _invocation: &ToolInvocation,
///         _cancel: &CancellationToken,
///     ) -> Result<CapturedOutput, ToolLaunchError> {
///         Ok(CapturedOutput::new("main.go:1::warning: unused (deadcode)\n", Some(1)))
///     }
/// }
/// ```
pub trait ToolRunner {
    /// Runs the invocation to completion and returns its merged output.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolLaunchError`] if the tool cannot be started, its output
    /// cannot be read, or it is killed after a timeout or cancellation.
    fn run(
        &self,
        invocation: &ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, ToolLaunchError>;
}
