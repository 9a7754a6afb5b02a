//! YAML loader for aggregate rule documents.

mod frontend;
mod parser;

use aggrules_rules::{AggRules, RuleError, RuleFrontend};

pub use frontend::YamlFrontend;

/// The built-in rule document.
pub const DEFAULT_RULES_YAML: &str = include_str!("default_rules.yaml");

/// Load the built-in rule document. The result still has to be validated.
pub fn default_rules() -> Result<AggRules, RuleError> {
    YamlFrontend.parse(DEFAULT_RULES_YAML)
}
