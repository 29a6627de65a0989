//! Check that every harvested grob property maps to declared rules.
//!
//! Usage:
//!   check-property-parity
//!   check-property-parity --root ../engraving --format json
//!   check-property-parity --map coverage/draft_map.yaml --strict-patterns
//!
//! Exits 1 when a property is unmapped or a mapping names an unregistered
//! rule, 2 when `--strict-patterns` finds a mapping pattern that does not
//! compile.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engraving_parity::report::{property_report_json, render_property_report};
use engraving_parity::{
    EXIT_OK, EXIT_PARITY_FAILURE, EXIT_USAGE, MappingDocument, MappingTable, ParityConfig,
    PropertyListDocument, Registry, check_property_parity, find_repo_root, init_logging,
};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "check-property-parity")]
#[command(about = "Check harvested grob properties against the property map and rule registry")]
struct Cli {
    /// Repository root; discovered from the environment when omitted.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Override the rule registry path.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Override the harvested property list path.
    #[arg(long)]
    properties: Option<PathBuf>,
    /// Override the property map path.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Treat mapping patterns that fail to compile as a usage error.
    #[arg(long)]
    strict_patterns: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() {
    init_logging();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(EXIT_PARITY_FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let registry = Registry::load(&config.registry)?;
    let properties = PropertyListDocument::load(&config.properties)?;
    let mapping = MappingDocument::load(&config.property_map)?;
    let table = MappingTable::from_document(&mapping);

    if cli.strict_patterns && !table.rejected().is_empty() {
        eprintln!(
            "{} mapping pattern(s) in {} failed to compile:",
            table.rejected().len(),
            config.property_map.display()
        );
        for rejected in table.rejected() {
            eprintln!("  - {}: {}", rejected.key, rejected.error);
        }
        return Ok(EXIT_USAGE);
    }

    let report = check_property_parity(&properties.properties, &table, &registry);
    match cli.format {
        OutputFormat::Text => print!("{}", render_property_report(&report)),
        OutputFormat::Json => println!("{}", property_report_json(&report)?),
    }

    Ok(if report.is_ok() {
        EXIT_OK
    } else {
        EXIT_PARITY_FAILURE
    })
}

fn resolve_config(cli: &Cli) -> Result<ParityConfig> {
    let fully_overridden = cli.registry.is_some() && cli.properties.is_some() && cli.map.is_some();
    let base = if fully_overridden && cli.root.is_none() {
        ParityConfig::for_root(Path::new("."))
    } else {
        let repo_root = find_repo_root(cli.root.as_deref()).context("locating repo root")?;
        ParityConfig::for_root(&repo_root)
    };
    Ok(base
        .with_registry(cli.registry.clone())
        .with_properties(cli.properties.clone())
        .with_property_map(cli.map.clone()))
}
