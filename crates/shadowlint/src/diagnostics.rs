//! Parsing of the tool's line-oriented diagnostic output.
//!
//! Each diagnostic occupies one line of the form
//! `<path>:<line>:[<column>]:(warning|error): <message>`. Anything else the
//! tool prints (progress chatter, stderr noise) is ignored.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and is covered by the unit tests"
)]
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<path>[^:]+):(?P<line>\d+):(?P<column>\d+)?:(?P<level>warning|error):\s*(?P<message>.*)$",
    )
    .expect("diagnostic pattern is valid")
});

/// Severity reported by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    /// A warning.
    Warning,
    /// An error.
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One diagnostic reported against a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Path as printed by the tool, usually relative to its working directory.
    pub path: String,
    /// One-based line number.
    pub line: u32,
    /// One-based column, when the tool reports one.
    pub column: Option<u32>,
    /// Reported severity.
    pub level: DiagnosticLevel,
    /// Message text, including any trailing linter name.
    pub message: String,
}

impl Diagnostic {
    /// Parses a single output line.
    ///
    /// ```
    /// use shadowlint::{Diagnostic, DiagnosticLevel};
    ///
    /// let diagnostic = Diagnostic::parse("main.go:3:1:error: expected ';' (gotype)")
    ///     .expect("line should parse");
    /// assert_eq!(diagnostic.line, 3);
    /// assert_eq!(diagnostic.level, DiagnosticLevel::Error);
    /// assert!(Diagnostic::parse("ok\tgithub.com/u/proj").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let captures = DIAGNOSTIC_LINE.captures(line.trim_end_matches('\r'))?;
        Some(Self {
            path: text(&captures, "path")?.to_owned(),
            line: text(&captures, "line")?.parse().ok()?,
            column: text(&captures, "column").and_then(|column| column.parse().ok()),
            level: match text(&captures, "level")? {
                "error" => DiagnosticLevel::Error,
                _ => DiagnosticLevel::Warning,
            },
            message: text(&captures, "message")?.to_owned(),
        })
    }

    /// Returns true when the diagnostic refers to a file named `basename`.
    #[must_use]
    pub fn refers_to(&self, basename: &str) -> bool {
        self.path == basename || self.path.ends_with(&format!("/{basename}"))
    }
}

fn text<'t>(captures: &Captures<'t>, name: &str) -> Option<&'t str> {
    captures.name(name).map(|found| found.as_str())
}

/// Parses every diagnostic line in `output`, skipping everything else.
#[must_use]
pub fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(Diagnostic::parse).collect()
}

/// Keeps only the lines of `output` that parse as diagnostics.
///
/// Used when the tool was already restricted to the target and anything
/// else it printed is chatter.
///
/// ```
/// use shadowlint::diagnostic_lines;
///
/// let output = "running linters\nmain.go:4:2:error: boom (vet)\nDEBUG: done\n";
/// assert_eq!(diagnostic_lines(output), "main.go:4:2:error: boom (vet)\n");
/// ```
#[must_use]
pub fn diagnostic_lines(output: &str) -> String {
    keep_lines(output, |line| Diagnostic::parse(line).is_some())
}

/// Keeps only the lines of `output` that report against `basename`.
///
/// Used when the tool lints a whole package in place and reports on every
/// file in it.
///
/// ```
/// use shadowlint::filter_for_target;
///
/// let output = "main.go:1::warning: a\nutil.go:2::warning: b\nmain.go.bak:3::error: c\n";
/// assert_eq!(filter_for_target(output, "main.go"), "main.go:1::warning: a\n");
/// ```
#[must_use]
pub fn filter_for_target(output: &str, basename: &str) -> String {
    let prefix = format!("{basename}:");
    keep_lines(output, |line| line.starts_with(&prefix))
}

fn keep_lines(output: &str, keep: impl Fn(&str) -> bool) -> String {
    output
        .lines()
        .filter(|line| keep(line))
        .fold(String::new(), |mut kept, line| {
            kept.push_str(line);
            kept.push('\n');
            kept
        })
}
