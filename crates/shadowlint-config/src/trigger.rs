//! Lint trigger modes configured by the host editor.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// When the host editor asks for a lint pass.
///
/// The trigger decides whether the linted content can differ from the file on
/// disk. Only [`LintTrigger::Background`] and [`LintTrigger::Manual`] lint
/// content that may not have been saved yet.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum LintTrigger {
    /// Lint on every buffer change ("on type").
    #[default]
    #[serde(alias = "on_type")]
    #[strum(to_string = "background", serialize = "on_type")]
    Background,
    /// Lint when the file is loaded or saved.
    #[serde(alias = "on_load_save")]
    #[strum(to_string = "load_save", serialize = "on_load_save")]
    LoadSave,
    /// Lint only when the file is saved.
    #[serde(alias = "save_only")]
    #[strum(to_string = "save", serialize = "save_only")]
    Save,
    /// Lint only on explicit request.
    #[strum(to_string = "manual")]
    Manual,
}

impl LintTrigger {
    /// Returns true when a lint pass may observe unsaved buffer content.
    ///
    /// ```
    /// use shadowlint_config::LintTrigger;
    ///
    /// assert!(LintTrigger::Background.lints_unsaved_content());
    /// assert!(!LintTrigger::Save.lints_unsaved_content());
    /// ```
    #[must_use]
    pub const fn lints_unsaved_content(self) -> bool {
        matches!(self, Self::Background | Self::Manual)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::LintTrigger;

    #[rstest]
    #[case("background", LintTrigger::Background)]
    #[case("On_Type", LintTrigger::Background)]
    #[case("load_save", LintTrigger::LoadSave)]
    #[case("on_load_save", LintTrigger::LoadSave)]
    #[case("save", LintTrigger::Save)]
    #[case("save_only", LintTrigger::Save)]
    #[case("MANUAL", LintTrigger::Manual)]
    fn parses_trigger_names(#[case] input: &str, #[case] expected: LintTrigger) {
        assert_eq!(LintTrigger::from_str(input).ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_trigger() {
        assert!(LintTrigger::from_str("on_idle").is_err());
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(LintTrigger::Save.to_string(), "save");
        assert_eq!(LintTrigger::LoadSave.to_string(), "load_save");
    }

    #[rstest]
    #[case(LintTrigger::Background, true)]
    #[case(LintTrigger::Manual, true)]
    #[case(LintTrigger::LoadSave, false)]
    #[case(LintTrigger::Save, false)]
    fn reports_unsaved_content(#[case] trigger: LintTrigger, #[case] expected: bool) {
        assert_eq!(trigger.lints_unsaved_content(), expected);
    }
}
