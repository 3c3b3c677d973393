//! Command execution for the `rarity` binary.

use std::path::Path;

use anyhow::Context;
use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::info;

use rarity_rs::io::opensea::CollectionSnapshot;
use rarity_rs::{RarityConfig, RarityEngine, RarityReport};

use crate::cli::args::{OutputFormat, ScoreArgs, ValidateConfigArgs};

/// Load configuration from a YAML file, or defaults when no path is given
pub fn load_configuration(config_path: Option<&Path>) -> anyhow::Result<RarityConfig> {
    let config = match config_path {
        Some(path) => RarityConfig::from_yaml_file(path)?,
        None => RarityConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Score a collection snapshot and print the report
pub fn score_command(args: ScoreArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref())?;
    if args.no_normalize {
        config.scoring.normalized = false;
    }

    let collection = CollectionSnapshot::from_json_file(&args.snapshot)
        .and_then(CollectionSnapshot::into_collection)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;

    let engine = RarityEngine::new(config)?;
    let scored = if args.tokens.is_empty() {
        engine.score_collection(&collection)
    } else {
        engine.score_selected(&collection, args.tokens.as_slice())
    };
    let report = match scored {
        Ok(report) => report,
        Err(err) => {
            if err.is_data_error() {
                eprintln!(
                    "{}",
                    "Snapshot trait counts disagree with its assets or total supply".yellow()
                );
            }
            return Err(err.into());
        }
    };
    info!("Scored {} tokens of '{}'", report.tokens.len(), report.collection);

    println!("{}", format_report(&report, args.format)?);
    Ok(())
}

/// Render a report in the requested output format
pub fn format_report(report: &RarityReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => report.to_json_pretty()?,
        OutputFormat::Text => report.render_text(),
        OutputFormat::Table => render_table(report),
    })
}

/// Row of the summary table.
#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Rarest attribute")]
    rarest: String,
}

fn render_table(report: &RarityReport) -> String {
    let rows: Vec<ScoreRow> = report
        .tokens
        .iter()
        .map(|token| ScoreRow {
            token: token.token_id.clone(),
            score: format!("{:.6}", token.score),
            rarest: token
                .attributes
                .iter()
                .min_by(|a, b| a.probability.total_cmp(&b.probability))
                .map(|attr| format!("{} ({:.4})", attr.name, attr.probability))
                .unwrap_or_default(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    format!(
        "{} {}\n{}",
        "Collection:".bright_blue().bold(),
        report.collection,
        table
    )
}

/// Print default configuration in YAML format
pub fn print_default_config() -> anyhow::Result<()> {
    println!("# Default rarity configuration");
    println!("# Usage: rarity score --config your-config.yml collection.json");
    println!();
    print!("{}", RarityConfig::default().to_yaml()?);
    Ok(())
}

/// Validate a configuration file and summarize its settings
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    let config = match load_configuration(Some(&args.config)) {
        Ok(config) => {
            println!("{}", "Configuration file is valid".bright_green().bold());
            config
        }
        Err(e) => {
            eprintln!("{} {}", "Configuration validation failed:".red(), e);
            eprintln!(
                "{}",
                "Tip: use 'rarity print-default-config' to see the valid format".dimmed()
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    /// Row used when printing configuration settings.
    #[derive(Tabled)]
    struct SettingRow {
        setting: &'static str,
        value: String,
    }

    let rows = vec![
        SettingRow {
            setting: "Normalized weights",
            value: config.scoring.normalized.to_string(),
        },
        SettingRow {
            setting: "Validate on load",
            value: config.collection.validate_on_load.to_string(),
        },
        SettingRow {
            setting: "Parallel batches",
            value: config.performance.parallel_batch.to_string(),
        },
        SettingRow {
            setting: "Min parallel batch",
            value: config.performance.min_parallel_batch.to_string(),
        },
        SettingRow {
            setting: "Max threads",
            value: config
                .performance
                .max_threads
                .map_or_else(|| "rayon default".to_string(), |n| n.to_string()),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
    Ok(())
}
