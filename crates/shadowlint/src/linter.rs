//! The host-facing lint entry point.
//!
//! A [`Linter`] turns a [`LintRequest`] into one tool run: it picks an
//! [`ExecutionStrategy`], prepares a shadow tree when the strategy needs one,
//! runs the tool with a per-strategy command line, and removes the shadow
//! tree afterwards whatever the outcome.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use shadowlint_config::{ConfigError, MODULE_ROOT_VAR, ModuleRoot, Settings};
use shadowlint_workspace::{
    FlatTreeBuilder, ShadowRoot, ShadowTreeBuilder, has_vendor_marker, materialize,
    materialize_at,
};
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostic, diagnostic_lines, filter_for_target, parse_diagnostics};
use crate::error::LintError;
use crate::invoker::{CancellationToken, CapturedOutput, ProcessRunner, ToolInvocation, ToolRunner};
use crate::request::LintRequest;
use crate::strategy::{ExecutionStrategy, StrategySelector};

/// Tracing target for lint orchestration.
const LINTER_TARGET: &str = "shadowlint::linter";

/// Flag restricting the tool's report to files matching a pattern.
const INCLUDE_FLAG: &str = "-I";

/// Outcome of a successful lint pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    strategy: ExecutionStrategy,
    output: String,
    diagnostics: Vec<Diagnostic>,
    exit_code: Option<i32>,
}

impl LintReport {
    /// Strategy the pass ran with.
    #[must_use]
    pub const fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Tool output relevant to the target, one diagnostic per line.
    #[must_use]
    pub fn output(&self) -> &str {
        self.output.as_str()
    }

    /// Diagnostics parsed from [`LintReport::output`].
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Tool exit code, absent when it was ended by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns true when the tool reported nothing for the target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.trim().is_empty()
    }
}

/// Lints editor buffers with the configured external tool.
///
/// ```rust,no_run
/// use shadowlint::{LintRequest, Linter};
/// use shadowlint_config::Settings;
///
/// # fn main() -> Result<(), shadowlint_config::ConfigError> {
/// let linter = Linter::new(Settings::default())?;
/// let request = LintRequest::detect_dirty("/home/u/proj/svc/main.go", "package main\n");
/// if let Some(report) = linter.lint(&request) {
///     for diagnostic in report.diagnostics() {
///         println!("{}:{} {}", diagnostic.line, diagnostic.level, diagnostic.message);
///     }
/// }
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Linter<R = ProcessRunner> {
    settings: Settings,
    module_root: ModuleRoot,
    selector: StrategySelector,
    temp_area: Option<PathBuf>,
    runner: R,
}

impl Linter<ProcessRunner> {
    /// Creates a linter, resolving the module root from the settings and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no absolute module root can be resolved.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let module_root = ModuleRoot::from_environment(&settings)?;
        Ok(Self::with_module_root(settings, module_root))
    }

    /// Creates a linter for an already resolved module root.
    #[must_use]
    pub const fn with_module_root(settings: Settings, module_root: ModuleRoot) -> Self {
        let selector = StrategySelector::new(settings.lint_mode());
        Self {
            settings,
            module_root,
            selector,
            temp_area: None,
            runner: ProcessRunner,
        }
    }
}

impl<R: ToolRunner> Linter<R> {
    /// Replaces the tool runner.
    #[must_use]
    pub fn with_runner<S: ToolRunner>(self, runner: S) -> Linter<S> {
        Linter {
            settings: self.settings,
            module_root: self.module_root,
            selector: self.selector,
            temp_area: self.temp_area,
            runner,
        }
    }

    /// Places shadow roots below `temp_area` instead of the system
    /// temporary-files directory.
    #[must_use]
    pub fn with_temp_area(mut self, temp_area: impl Into<PathBuf>) -> Self {
        self.temp_area = Some(temp_area.into());
        self
    }

    /// Module root the linter resolves imports against.
    #[must_use]
    pub const fn module_root(&self) -> &ModuleRoot {
        &self.module_root
    }

    /// Settings the linter was created with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Lints a buffer, hiding failures from the caller.
    ///
    /// Returns `None` when the pass fails (the error is logged) or when the
    /// tool reports nothing for the target.
    #[must_use]
    pub fn lint(&self, request: &LintRequest) -> Option<LintReport> {
        self.lint_with_cancellation(request, &CancellationToken::new())
    }

    /// Like [`Linter::lint`], abandoning the run once `cancel` fires.
    #[must_use]
    pub fn lint_with_cancellation(
        &self,
        request: &LintRequest,
        cancel: &CancellationToken,
    ) -> Option<LintReport> {
        match self.try_lint_with_cancellation(request, cancel) {
            Ok(report) if report.is_empty() => None,
            Ok(report) => Some(report),
            Err(error) => {
                warn!(
                    target: LINTER_TARGET,
                    target_file = %request.target().display(),
                    %error,
                    "lint pass failed"
                );
                None
            }
        }
    }

    /// Lints a buffer and reports failures.
    ///
    /// # Errors
    ///
    /// Returns [`LintError`] when the target is not an absolute file path,
    /// the shadow tree cannot be prepared, or the tool cannot be run.
    pub fn try_lint(&self, request: &LintRequest) -> Result<LintReport, LintError> {
        self.try_lint_with_cancellation(request, &CancellationToken::new())
    }

    /// Like [`Linter::try_lint`], abandoning the run once `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Linter::try_lint`].
    pub fn try_lint_with_cancellation(
        &self,
        request: &LintRequest,
        cancel: &CancellationToken,
    ) -> Result<LintReport, LintError> {
        let target = LintTarget::new(request.target())?;
        let module_root = self.module_root.path();
        let strategy = self.selector.select(request.is_dirty(), || {
            has_vendor_marker(module_root, target.package_dir)
        });
        info!(
            target: LINTER_TARGET,
            target_file = %target.path.display(),
            %strategy,
            "starting lint pass"
        );

        let (output, text) = match strategy {
            ExecutionStrategy::InPlace => {
                let output = self.run_in_place(&target, cancel)?;
                let text = filter_for_target(output.text(), &target.basename);
                (output, text)
            }
            ExecutionStrategy::ShadowCopy => {
                let output = self.run_shadow_copy(&target, request.buffer(), cancel)?;
                let text = diagnostic_lines(output.text());
                (output, text)
            }
            ExecutionStrategy::PlainTemp => {
                let output = self.run_plain_temp(&target, request.buffer(), cancel)?;
                let text = diagnostic_lines(output.text());
                (output, text)
            }
        };

        let diagnostics = parse_diagnostics(&text);
        debug!(
            target: LINTER_TARGET,
            %strategy,
            diagnostics = diagnostics.len(),
            exit_code = ?output.exit_code(),
            "lint pass finished"
        );
        Ok(LintReport {
            strategy,
            output: text,
            diagnostics,
            exit_code: output.exit_code(),
        })
    }

    fn run_in_place(
        &self,
        target: &LintTarget<'_>,
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, LintError> {
        let invocation = self
            .invocation(target.package_dir, self.module_root.path())
            .with_args(["."]);
        Ok(self.runner.run(&invocation, cancel)?)
    }

    fn run_shadow_copy(
        &self,
        target: &LintTarget<'_>,
        buffer: &str,
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, LintError> {
        let module_root = self.module_root.path();
        let mut builder = ShadowTreeBuilder::new(module_root);
        if let Some(temp_area) = &self.temp_area {
            builder = builder.with_temp_area(temp_area);
        }
        let shadow = builder.build(target.path)?;
        let slot = materialize(shadow.path(), module_root, target.path, buffer)?;
        let working_dir = slot
            .parent()
            .map_or_else(|| shadow.path().to_path_buf(), Path::to_path_buf);

        let invocation = self
            .invocation(&working_dir, shadow.path())
            .with_args(include_args(&target.basename));
        let result = self.runner.run(&invocation, cancel);
        finish(shadow);
        Ok(result?)
    }

    fn run_plain_temp(
        &self,
        target: &LintTarget<'_>,
        buffer: &str,
        cancel: &CancellationToken,
    ) -> Result<CapturedOutput, LintError> {
        let mut builder = FlatTreeBuilder::new();
        if let Some(temp_area) = &self.temp_area {
            builder = builder.with_temp_area(temp_area);
        }
        let shadow = builder.build(target.path)?;
        materialize_at(&shadow.path().join(&target.basename), buffer)?;

        let invocation = self
            .invocation(shadow.path(), self.module_root.path())
            .with_args(include_args(&target.basename));
        let result = self.runner.run(&invocation, cancel);
        finish(shadow);
        Ok(result?)
    }

    /// Base invocation: configured executable and flags, the module
    /// resolution variable, and the configured timeout.
    fn invocation(&self, working_dir: &Path, module_path: &Path) -> ToolInvocation {
        ToolInvocation::new(self.settings.executable().as_std_path(), working_dir)
            .with_args(self.settings.args())
            .with_env(MODULE_ROOT_VAR, module_path)
            .with_timeout(Duration::from_secs(self.settings.timeout_secs()))
    }
}

/// Arguments linting the working directory while reporting on one file.
fn include_args(basename: &str) -> [OsString; 3] {
    [
        OsString::from("."),
        OsString::from(INCLUDE_FLAG),
        OsString::from(format!("^{}", regex::escape(basename))),
    ]
}

fn finish(shadow: ShadowRoot) {
    let root = shadow.path().to_path_buf();
    let report = shadow.reap();
    if report.is_clean() {
        debug!(
            target: LINTER_TARGET,
            root = %root.display(),
            removed = report.removed(),
            "reaped shadow root"
        );
    } else {
        warn!(
            target: LINTER_TARGET,
            root = %root.display(),
            failures = report.failures().len(),
            "shadow root was not fully reaped"
        );
    }
}

/// A validated lint target.
struct LintTarget<'a> {
    path: &'a Path,
    package_dir: &'a Path,
    basename: String,
}

impl<'a> LintTarget<'a> {
    fn new(path: &'a Path) -> Result<Self, LintError> {
        let invalid = || LintError::InvalidTarget {
            path: path.to_path_buf(),
        };
        if !path.is_absolute() {
            return Err(invalid());
        }
        let basename = path.file_name().ok_or_else(invalid)?;
        let package_dir = path.parent().ok_or_else(invalid)?;
        Ok(Self {
            path,
            package_dir,
            basename: basename.to_string_lossy().into_owned(),
        })
    }
}
