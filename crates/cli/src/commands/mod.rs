pub mod check;
pub mod matching;

use aggrules_rules::{AggRules, RuleFrontend};
use aggrules_yaml::YamlFrontend;
use anyhow::Context;

use crate::config::Settings;

/// Load the configured rule document, or the built-in one.
pub fn load_rules(settings: &Settings) -> anyhow::Result<AggRules> {
    match &settings.rules_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading rule document");
            YamlFrontend
                .parse_file(path)
                .with_context(|| format!("cannot load rules from {}", path.display()))
        }
        None => aggrules_yaml::default_rules().context("cannot load built-in rules"),
    }
}
