use aggrules_core::{Diagnostic, Level, ListRecorder};
use aggrules_rules::AggRules;
use serde::Serialize;

use crate::OutputFormat;
use crate::config::Settings;

/// Outcome of validating one rule document.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub tag: String,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn check(rules: &AggRules) -> CheckReport {
    let mut recorder = ListRecorder::new();
    let valid = rules.validate(&mut recorder);
    CheckReport {
        tag: rules.tag().to_string(),
        valid,
        errors: recorder.count(Level::Error),
        warnings: recorder.count(Level::Warn),
        diagnostics: recorder.into_diagnostics(),
    }
}

pub fn run(settings: &Settings, format: &OutputFormat) -> anyhow::Result<()> {
    let rules = super::load_rules(settings)?;
    let report = check(&rules);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for diagnostic in &report.diagnostics {
                println!("{diagnostic}");
            }
            println!(
                "{tag}: {errors} error(s), {warnings} warning(s)",
                tag = report.tag,
                errors = report.errors,
                warnings = report.warnings,
            );
        }
    }

    if !report.valid {
        anyhow::bail!("rule document '{}' is invalid", report.tag);
    }
    Ok(())
}
