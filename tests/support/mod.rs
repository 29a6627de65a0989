#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use engraving_parity::config::{
    DEFAULT_PROPERTIES_PATH, DEFAULT_PROPERTY_MAP_PATH, DEFAULT_REGISTRY_PATH,
    DEFAULT_TYPED_API_PATH,
};

// Writes `contents` at `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn registry_yaml(ids: &[&str]) -> String {
    if ids.is_empty() {
        return "rules: []\n".to_string();
    }
    let mut out = String::from("rules:\n");
    for id in ids {
        out.push_str(&format!("  - id: {id}\n    title: fixture rule {id}\n"));
    }
    out
}

pub fn properties_yaml(names: &[&str]) -> String {
    if names.is_empty() {
        return "properties: []\n".to_string();
    }
    let mut out = String::from("properties:\n");
    for name in names {
        out.push_str(&format!("- {name}\n"));
    }
    out
}

pub fn typed_yaml(operation_ids: &[&str]) -> String {
    let mut out = String::from("openapi: 3.0.3\npaths:\n");
    for id in operation_ids {
        out.push_str(&format!(
            "  /rules/{id}:\n    post:\n      operationId: {id}\n"
        ));
    }
    if operation_ids.is_empty() {
        out = "openapi: 3.0.3\npaths: {}\n".to_string();
    }
    out
}

// A throwaway engraving repository laid out at the default document paths.
pub struct FixtureRepo {
    pub dir: TempDir,
}

impl FixtureRepo {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate fixture repo")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_registry(self, ids: &[&str]) -> Result<Self> {
        write_file(self.root(), DEFAULT_REGISTRY_PATH, registry_yaml(ids))?;
        Ok(self)
    }

    pub fn with_properties(self, names: &[&str]) -> Result<Self> {
        write_file(self.root(), DEFAULT_PROPERTIES_PATH, properties_yaml(names))?;
        Ok(self)
    }

    pub fn with_map(self, body: &str) -> Result<Self> {
        write_file(self.root(), DEFAULT_PROPERTY_MAP_PATH, body)?;
        Ok(self)
    }

    pub fn with_typed(self, operation_ids: &[&str]) -> Result<Self> {
        write_file(self.root(), DEFAULT_TYPED_API_PATH, typed_yaml(operation_ids))?;
        Ok(self)
    }
}

pub fn run_bin(bin: &str, args: &[&str], cwd: &Path) -> Result<Output> {
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env_remove("ENGRAVING_PARITY_ROOT")
        .env_remove("RUST_LOG")
        .output()
        .with_context(|| format!("failed to execute {bin}"))
}
