//! Turning rule text into compiled patterns.
//!
//! Every pattern produced here must match the whole candidate name, so the
//! author's text is wrapped in `^(?:...)$` before compilation. The case
//! policy decides whether the compiled pattern is case-insensitive; only the
//! variable literal portion of a pattern is ever case-folded.

pub mod derive;
pub mod template;

use aggrules_core::CharCase;
use regex::{Regex, RegexBuilder};

use crate::error::RuleError;

pub use derive::{compile_basename, derive_literal, derive_matcher};
pub use template::{TemplatePart, compile_template, parse_template, render_template};

/// Compile `pattern` so that it only accepts whole-string matches.
pub fn full_match(pattern: &str, case: CharCase) -> Result<Regex, RuleError> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(case.is_case_insensitive())
        .build()
        .map_err(|e| RuleError::InvalidRegex(e.to_string()))
}

/// Fold and escape a caller-supplied literal so it can be embedded in a
/// pattern without its characters being read as regex syntax.
pub fn literal(value: &str, case: CharCase) -> String {
    regex::escape(&case.fold(value))
}
