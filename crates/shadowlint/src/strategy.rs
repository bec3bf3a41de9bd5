//! Choice of execution strategy for one lint pass.

use std::fmt;

use shadowlint_config::LintTrigger;
use tracing::debug;

/// Tracing target for strategy selection.
const STRATEGY_TARGET: &str = "shadowlint::strategy";

/// How the external tool is pointed at the code being linted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// Lint the real file where it lives; no shadow tree is built.
    InPlace,
    /// Build a linked mirror of the ancestor chain up to the module root and
    /// overlay the buffer inside it.
    ShadowCopy,
    /// Link the package's own sources flatly into a fresh directory and
    /// overlay the buffer there.
    PlainTemp,
}

impl ExecutionStrategy {
    /// Returns true when the strategy lints a temporary copy of the buffer.
    #[must_use]
    pub const fn uses_shadow(self) -> bool {
        !matches!(self, Self::InPlace)
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InPlace => "in_place",
            Self::ShadowCopy => "shadow_copy",
            Self::PlainTemp => "plain_temp",
        };
        f.write_str(name)
    }
}

/// Decides the [`ExecutionStrategy`] for a buffer.
///
/// Rules are evaluated in order and the first match wins:
///
/// 1. a clean buffer is linted in place;
/// 2. a trigger that only lints flushed content is linted in place;
/// 3. a package entangled with a `vendor` tree gets a full shadow copy;
/// 4. anything else gets a flat temporary copy.
///
/// `vendored` is only evaluated when rule 3 is reached, so the directory
/// scan is skipped for clean buffers.
///
/// ```
/// use shadowlint::{ExecutionStrategy, StrategySelector};
/// use shadowlint_config::LintTrigger;
///
/// let selector = StrategySelector::new(LintTrigger::Background);
/// assert_eq!(selector.select(false, || true), ExecutionStrategy::InPlace);
/// assert_eq!(selector.select(true, || true), ExecutionStrategy::ShadowCopy);
/// assert_eq!(selector.select(true, || false), ExecutionStrategy::PlainTemp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySelector {
    trigger: LintTrigger,
}

impl StrategySelector {
    /// Creates a selector for the configured trigger.
    #[must_use]
    pub const fn new(trigger: LintTrigger) -> Self {
        Self { trigger }
    }

    /// Configured trigger.
    #[must_use]
    pub const fn trigger(&self) -> LintTrigger {
        self.trigger
    }

    /// Selects the strategy for a buffer.
    #[must_use]
    pub fn select(&self, dirty: bool, vendored: impl FnOnce() -> bool) -> ExecutionStrategy {
        let strategy = if !dirty || !self.trigger.lints_unsaved_content() {
            ExecutionStrategy::InPlace
        } else if vendored() {
            ExecutionStrategy::ShadowCopy
        } else {
            ExecutionStrategy::PlainTemp
        };
        debug!(
            target: STRATEGY_TARGET,
            dirty,
            trigger = %self.trigger,
            %strategy,
            "selected execution strategy"
        );
        strategy
    }
}
