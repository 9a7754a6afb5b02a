use aggrules_rules::{AggRule, MatchTrace, Matcher};
use anyhow::Context;
use clap::{Args, Subcommand};

use crate::OutputFormat;
use crate::config::Settings;

#[derive(Args, Debug)]
pub struct MatchArgs {
    #[command(subcommand)]
    pub slot: SlotCommand,
}

#[derive(Subcommand, Debug)]
pub enum SlotCommand {
    /// Aggregate table names of a fact table.
    Table {
        /// Fact table name.
        #[arg(long)]
        fact: String,
        /// Table names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// The fact-count column.
    FactCount {
        /// Column names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Aggregate columns standing for a fact-table foreign key.
    ForeignKey {
        /// Fact-table foreign-key column name.
        #[arg(long)]
        key: String,
        /// Column names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Aggregate columns holding a dimension level.
    Level {
        /// Hierarchy name.
        #[arg(long)]
        hierarchy: String,
        /// Level name.
        #[arg(long)]
        level: String,
        /// Level column name.
        #[arg(long)]
        column: String,
        /// Column prefix of the dimension usage.
        #[arg(long)]
        usage_prefix: Option<String>,
        /// Column names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Aggregate columns holding a measure.
    Measure {
        /// Measure name.
        #[arg(long)]
        measure: String,
        /// Measure column name.
        #[arg(long)]
        column: String,
        /// Aggregate function name, e.g. `sum`.
        #[arg(long)]
        aggregate: String,
        /// Column names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Columns recognition should skip.
    Ignore {
        /// Column names to test.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
}

impl SlotCommand {
    /// Build the matcher this command asks for.
    pub fn matcher(&self, rule: &AggRule) -> anyhow::Result<Matcher> {
        let matcher = match self {
            Self::Table { fact, .. } => rule.table_matcher(fact)?,
            Self::FactCount { .. } => rule.fact_count_matcher()?,
            Self::ForeignKey { key, .. } => rule.foreign_key_matcher(key)?,
            Self::Level {
                hierarchy,
                level,
                column,
                usage_prefix,
                ..
            } => rule.level_matcher(usage_prefix.as_deref(), hierarchy, level, column)?,
            Self::Measure {
                measure,
                column,
                aggregate,
                ..
            } => rule.measure_matcher(measure, column, aggregate)?,
            Self::Ignore { .. } => rule.ignore_matcher()?,
        };
        Ok(matcher)
    }

    /// The names to test.
    pub fn candidates(&self) -> &[String] {
        match self {
            Self::Table { candidates, .. }
            | Self::FactCount { candidates }
            | Self::ForeignKey { candidates, .. }
            | Self::Level { candidates, .. }
            | Self::Measure { candidates, .. }
            | Self::Ignore { candidates } => candidates,
        }
    }
}

pub fn run(settings: &Settings, args: &MatchArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let rules = super::load_rules(settings)?
        .into_validated()
        .context("rule document is invalid; run `aggrules check` for details")?;
    let rule = rules.rule(settings.tag.as_deref())?;
    let matcher = args.slot.matcher(rule)?;
    let traces: Vec<MatchTrace> = args
        .slot
        .candidates()
        .iter()
        .map(|c| matcher.trace(c))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&traces)?);
        }
        OutputFormat::Text => {
            println!("rule '{}':", rule.tag);
            if matcher.is_never() {
                println!("  (no patterns)");
            }
            for pattern in matcher.patterns() {
                println!("  {id}: {regex}", id = pattern.id(), regex = pattern.as_str());
            }
            for trace in &traces {
                match &trace.matched_pattern {
                    Some(id) => println!("{}: matched by '{id}'", trace.candidate),
                    None => println!("{}: no match", trace.candidate),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> std::sync::Arc<aggrules_rules::AggRules> {
        aggrules_yaml::default_rules().unwrap().into_validated().unwrap()
    }

    #[test]
    fn level_command_builds_level_matcher() {
        let rules = default_rules();
        let rule = rules.rule(None).unwrap();
        let cmd = SlotCommand::Level {
            hierarchy: "Time".into(),
            level: "Day in Year".into(),
            column: "day_of_year".into(),
            usage_prefix: None,
            candidates: vec!["time_day_in_year".into()],
        };
        let matcher = cmd.matcher(rule).unwrap();
        assert_eq!(matcher.first_match(&cmd.candidates()[0]), Some("logical"));
    }

    #[test]
    fn table_command_traces_candidates() {
        let rules = default_rules();
        let rule = rules.rule(None).unwrap();
        let cmd = SlotCommand::Table {
            fact: "sales_fact_1997".into(),
            candidates: vec!["agg_c_sales_fact_1997".into(), "sales_fact_1997".into()],
        };
        let matcher = cmd.matcher(rule).unwrap();
        let traces: Vec<_> = cmd.candidates().iter().map(|c| matcher.trace(c)).collect();
        assert!(traces[0].is_match());
        assert!(!traces[1].is_match());
    }

    #[test]
    fn ignore_command_on_default_rules_matches_nothing() {
        let rules = default_rules();
        let rule = rules.rule(None).unwrap();
        let cmd = SlotCommand::Ignore {
            candidates: vec!["anything".into()],
        };
        assert!(!cmd.matcher(rule).unwrap().matches("anything"));
    }
}
