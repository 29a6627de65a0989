//! Harvest grob property names from a LilyPond source tree.
//!
//! Usage:
//!   harvest-grob-properties /path/to/lilypond
//!   harvest-grob-properties /path/to/lilypond --ext scm --output /tmp/props.yaml
//!
//! Writes `properties: [...]` to `coverage/grob_properties.yaml` under the
//! repository root unless `--output` is given.

use anyhow::{Context, Result};
use clap::Parser;
use engraving_parity::{
    EXIT_OK, EXIT_PARITY_FAILURE, EXIT_USAGE, HarvestOptions, ParityConfig, PropertyListDocument,
    find_repo_root, harvest_with, init_logging,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "harvest-grob-properties")]
#[command(about = "Harvest grob property names from a LilyPond source tree")]
struct Cli {
    /// LilyPond source tree to scan.
    lilypond_root: PathBuf,
    /// Output file; defaults to coverage/grob_properties.yaml in the repository.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Repository root used to place the default output.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Only scan files with this extension at usage sites (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
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
    if !cli.lilypond_root.exists() {
        eprintln!("Not found: {}", cli.lilypond_root.display());
        return Ok(EXIT_USAGE);
    }

    let output = match cli.output {
        Some(path) => path,
        None => {
            let repo_root = find_repo_root(cli.root.as_deref()).context("locating repo root")?;
            ParityConfig::for_root(&repo_root).properties
        }
    };

    let options = HarvestOptions::with_extensions(&cli.extensions);
    let properties = harvest_with(&cli.lilypond_root, &options);
    let count = properties.len();
    PropertyListDocument { properties }.write(&output)?;

    println!("Wrote {} with {count} properties.", output.display());
    Ok(EXIT_OK)
}
