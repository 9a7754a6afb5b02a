//! Aggregate rules CLI
//!
//! Checks aggregate-table rule documents and tries their matchers against
//! candidate table and column names.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{AggregatesConfig, Settings};

/// Check aggregate-table recognition rules and try them on names.
#[derive(Parser, Debug)]
#[command(name = "aggrules", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "AGGRULES_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Rule document to load instead of the built-in rules.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Tag of the aggregate rule to use instead of the default rule.
    #[arg(long, global = true)]
    tag: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a rule document and print every diagnostic.
    Check,
    /// Build one slot's matcher and test candidate names against it.
    Match(commands::matching::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AggregatesConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(config, cli.rules, cli.tag);
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Command::Check => commands::check::run(&settings, &cli.format),
        Command::Match(args) => commands::matching::run(&settings, &args, &cli.format),
    }
}
