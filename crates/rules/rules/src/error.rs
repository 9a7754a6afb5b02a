use aggrules_core::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading rules or building matchers.
///
/// Configuration problems found by validation are not errors of this type;
/// they are reported as [`Diagnostic`]s. [`RuleError::Invalid`] wraps them
/// when a caller asks for a validated rule set in one step.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A parse error when loading rules from a frontend.
    #[error("parse error: {0}")]
    Parse(String),

    /// A regular expression could not be compiled.
    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    /// A template is malformed or is missing a value for one of its names.
    #[error("template error: {0}")]
    Template(String),

    /// Two objects of the same kind were registered under one id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Kind of object, e.g. `TableMatch`.
        kind: &'static str,
        /// The clashing id.
        id: String,
    },

    /// A matcher was requested from a slot that validation has not bound.
    #[error("{slot} slot of rule '{rule}' is not resolved; validate the rule set first")]
    Unresolved {
        /// Tag of the rule.
        rule: String,
        /// Slot kind, e.g. `LevelMap`.
        slot: &'static str,
    },

    /// No enabled rule carries the requested tag.
    #[error("unknown aggregate rule: {0}")]
    UnknownRule(String),

    /// No enabled rule is flagged default.
    #[error("no aggregate rule is flagged default")]
    NoDefaultRule,

    /// More than one enabled rule is flagged default.
    #[error("{0} aggregate rules are flagged default; expected exactly one")]
    AmbiguousDefaultRule(usize),

    /// Validation reported at least one error.
    #[error("rule set is invalid: {} error(s)", .0.len())]
    Invalid(Vec<Diagnostic>),
}
