//! CLI Argument Structures
//!
//! Command, argument and output-format definitions for the `rarity` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Attribute-probability rarity scoring
#[derive(Parser)]
#[command(name = "rarity")]
#[command(version = VERSION)]
#[command(about = "Score how rare each token of a collection is")]
#[command(long_about = "
Score tokens of a collection by the weighted geometric mean of their attribute
probabilities. Lower scores are rarer. Missing attributes count as a value of
their own.

Common Usage:

  # Score every asset of a snapshot
  rarity score collection.json

  # Score two tokens, plain weights, as a table
  rarity score collection.json --token 17 --token 204 --no-normalize --format table

  # Start from the default configuration
  rarity print-default-config > rarity.yml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the tokens of a collection snapshot
    Score(ScoreArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a rarity configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Collection snapshot (JSON)
    pub snapshot: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Weight every attribute equally instead of by its number of values
    #[arg(long)]
    pub no_normalize: bool,

    /// Only score these token ids, in the given order
    #[arg(short, long = "token", value_name = "ID")]
    pub tokens: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// Plain text, one block per token
    Text,
    /// Summary table
    Table,
}
