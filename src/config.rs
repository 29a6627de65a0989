//! Document locations for a parity run.
//!
//! Every entry point takes a `ParityConfig` instead of reaching for fixed
//! paths, so tests can point the checkers at fixture trees.

use std::path::{Path, PathBuf};

/// Rule registry, relative to the repository root.
pub const DEFAULT_REGISTRY_PATH: &str = "Engraving/rules/REGISTRY.yaml";
/// Harvested grob property list.
pub const DEFAULT_PROPERTIES_PATH: &str = "coverage/grob_properties.yaml";
/// Property-to-rule mapping.
pub const DEFAULT_PROPERTY_MAP_PATH: &str = "coverage/grob_property_map.yaml";
/// Typed OpenAPI surface exposing one operation per rule.
pub const DEFAULT_TYPED_API_PATH: &str = "Engraving/openapi/rules-as-functions.typed.yaml";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParityConfig {
    pub repo_root: PathBuf,
    pub registry: PathBuf,
    /// Read by the property checker and written by the harvester.
    pub properties: PathBuf,
    pub property_map: PathBuf,
    pub typed_api: PathBuf,
}

impl ParityConfig {
    pub fn for_root(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            registry: repo_root.join(DEFAULT_REGISTRY_PATH),
            properties: repo_root.join(DEFAULT_PROPERTIES_PATH),
            property_map: repo_root.join(DEFAULT_PROPERTY_MAP_PATH),
            typed_api: repo_root.join(DEFAULT_TYPED_API_PATH),
        }
    }

    pub fn with_registry(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.registry = path;
        }
        self
    }

    pub fn with_properties(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.properties = path;
        }
        self
    }

    pub fn with_property_map(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.property_map = path;
        }
        self
    }

    pub fn with_typed_api(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.typed_api = path;
        }
        self
    }
}
