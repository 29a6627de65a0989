pub mod config;
pub mod documents;
pub mod extract;
pub mod identity;
pub mod mapping;
pub mod parity;
pub mod report;

pub use config::ParityConfig;
pub use documents::{
    MappingDocument, Operation, PropertyListDocument, Registry, RegistryDocument,
    TypedApiDocument,
};
pub use extract::{HarvestOptions, harvest, harvest_with};
pub use identity::{PropertyName, RuleId};
pub use mapping::{MappingEntry, MappingKey, MappingTable, RejectedPattern, resolve};
pub use parity::{
    InvalidTarget, PropertyParityReport, TypedParityReport, check_property_parity,
    check_typed_parity,
};

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Exit status for a clean run.
pub const EXIT_OK: i32 = 0;
/// Exit status when a parity check finds gaps (or an input cannot be loaded).
pub const EXIT_PARITY_FAILURE: i32 = 1;
/// Exit status for invalid command-line input.
pub const EXIT_USAGE: i32 = 2;

const ROOT_SENTINEL: &str = config::DEFAULT_REGISTRY_PATH;
const ROOT_ENV: &str = "ENGRAVING_PARITY_ROOT";

fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(ROOT_SENTINEL).is_file()
}

fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository holding the rule registry.
///
/// Order: `explicit` (must exist, need not hold a registry yet), then
/// `ENGRAVING_PARITY_ROOT`, then an upward search from the working directory
/// and from the executable, then the build-time hint.
pub fn find_repo_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        if !root.is_dir() {
            bail!("repository root {} is not a directory", root.display());
        }
        return Ok(root.to_path_buf());
    }

    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("ENGRAVING_PARITY_ROOT_HINT") {
        if let Some(root) = repo_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate the engraving repository root (no {ROOT_SENTINEL} found). Pass --root or set {ROOT_ENV}."
    );
}

/// Install the stderr logger used by the binaries (`RUST_LOG` overrides).
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}
