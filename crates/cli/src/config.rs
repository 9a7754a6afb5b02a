use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "aggrules.toml";

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatesConfig {
    /// Rule document selection.
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Which rule document and rule to use.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule document path. The built-in document is used when absent.
    pub path: Option<PathBuf>,
    /// Tag of the aggregate rule. The default-flagged rule is used when absent.
    pub tag: Option<String>,
}

impl AggregatesConfig {
    /// Load the configuration.
    ///
    /// An explicitly named file must exist. Without one, `aggrules.toml` in
    /// the working directory is read if present, and defaults are used
    /// otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Effective settings after command-line flags override the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rule document path, or `None` for the built-in document.
    pub rules_path: Option<PathBuf>,
    /// Rule tag, or `None` for the default rule.
    pub tag: Option<String>,
}

impl Settings {
    pub fn resolve(config: AggregatesConfig, rules: Option<PathBuf>, tag: Option<String>) -> Self {
        Self {
            rules_path: rules.or(config.rules.path),
            tag: tag.or(config.rules.tag),
        }
    }
}
