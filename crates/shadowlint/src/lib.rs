//! Lints unsaved editor buffers with an external Go linting tool.
//!
//! The tool only reads files from disk and resolves imports against a module
//! root. To lint a buffer that has not been saved, the [`Linter`] chooses an
//! [`ExecutionStrategy`]:
//!
//! - clean buffers, or triggers that only fire after a save, are linted in
//!   place;
//! - packages that sit under a `vendor` tree get a full shadow copy of the
//!   module tree with the buffer overlaid, and the module resolution
//!   variable pointed at the copy;
//! - everything else is linted from a flat temporary copy of the package.
//!
//! Shadow trees are removed after every run. Failures are logged with
//! `tracing` and surface to the host as "no diagnostics".
//!
//! ```rust,no_run
//! use shadowlint::{LintRequest, Linter, telemetry};
//! use shadowlint_config::{LintTrigger, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default().with_lint_mode(LintTrigger::Background);
//! telemetry::initialise(&settings)?;
//! let linter = Linter::new(settings)?;
//! let request = LintRequest::new("/home/u/proj/svc/main.go", "package main\n", true);
//! let report = linter.try_lint(&request)?;
//! println!("{} diagnostics via {}", report.diagnostics().len(), report.strategy());
//! # Ok(()) }
//! ```

mod diagnostics;
mod error;
mod invoker;
mod linter;
mod request;
mod strategy;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use diagnostics::{
    Diagnostic, DiagnosticLevel, diagnostic_lines, filter_for_target, parse_diagnostics,
};
pub use error::{LintError, ToolLaunchError};
pub use invoker::{CancellationToken, CapturedOutput, ProcessRunner, ToolInvocation, ToolRunner};
pub use linter::{LintReport, Linter};
pub use request::LintRequest;
pub use strategy::{ExecutionStrategy, StrategySelector};
