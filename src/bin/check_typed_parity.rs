//! Check that every registered rule has a typed POST operation.
//!
//! Usage:
//!   check-typed-parity
//!   check-typed-parity --typed Engraving/openapi/draft.typed.yaml --format json

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engraving_parity::report::{render_typed_report, typed_report_json};
use engraving_parity::{
    EXIT_OK, EXIT_PARITY_FAILURE, ParityConfig, Registry, TypedApiDocument, check_typed_parity,
    find_repo_root, init_logging,
};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "check-typed-parity")]
#[command(about = "Check the rule registry against the typed OpenAPI operations")]
struct Cli {
    /// Repository root; discovered from the environment when omitted.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Override the rule registry path.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Override the typed OpenAPI document path.
    #[arg(long)]
    typed: Option<PathBuf>,
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
    let base = if cli.registry.is_some() && cli.typed.is_some() && cli.root.is_none() {
        ParityConfig::for_root(Path::new("."))
    } else {
        let repo_root = find_repo_root(cli.root.as_deref()).context("locating repo root")?;
        ParityConfig::for_root(&repo_root)
    };
    let config = base
        .with_registry(cli.registry)
        .with_typed_api(cli.typed);

    let registry = Registry::load(&config.registry)?;
    let typed = TypedApiDocument::load(&config.typed_api)?;
    let report = check_typed_parity(&registry, &typed.operation_ids());

    match cli.format {
        OutputFormat::Text => print!("{}", render_typed_report(&report)),
        OutputFormat::Json => println!("{}", typed_report_json(&report)?),
    }

    Ok(if report.is_ok() {
        EXIT_OK
    } else {
        EXIT_PARITY_FAILURE
    })
}
