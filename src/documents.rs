//! YAML documents consumed and produced by the parity tooling.
//!
//! Loaders attach the offending path to every error. Structural validation
//! stays minimal (unknown fields are ignored) except for the registry, which
//! rejects empty and duplicate rule ids so the checkers can treat it as a set.

use crate::identity::{PropertyName, RuleId};
use anyhow::{Context, Result, bail};
use serde::de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

fn load_yaml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading {what} {}", path.display()))?;
    serde_yaml::from_str(&data).with_context(|| format!("parsing {what} {}", path.display()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleRecord {
    pub id: RuleId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

impl RegistryDocument {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path, "rule registry")
    }
}

/// The authoritative set of rule ids for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    ids: BTreeSet<RuleId>,
}

impl Registry {
    /// Build a registry, rejecting empty and duplicate ids.
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = RuleId>,
    {
        let mut set = BTreeSet::new();
        for id in ids {
            if id.0.trim().is_empty() {
                bail!("registry contains a rule with an empty id");
            }
            if set.contains(&id) {
                bail!("duplicate rule id {id}");
            }
            set.insert(id);
        }
        Ok(Self { ids: set })
    }

    pub fn from_document(document: RegistryDocument) -> Result<Self> {
        Self::new(document.rules.into_iter().map(|rule| rule.id))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let document = RegistryDocument::load(path)?;
        Self::from_document(document).with_context(|| format!("validating {}", path.display()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Rule ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Harvester output and property checker input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListDocument {
    #[serde(default)]
    pub properties: Vec<PropertyName>,
}

impl PropertyListDocument {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path, "property list")
    }

    /// Write the list, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let body = serde_yaml::to_string(self).context("serializing property list")?;
        fs::write(path, body).with_context(|| format!("writing {}", path.display()))
    }
}

/// Declared mapping keys with their targets, in authoring order.
///
/// A key declared twice keeps its first position and takes the value of the
/// last declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntries(pub Vec<(String, Vec<RuleId>)>);

/// Targets of one mapping key: a single rule id or a list of them. Scalars
/// of any YAML type are read as their string form, as registry ids are.
struct Targets(Vec<RuleId>);

impl<'de> Deserialize<'de> for Targets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TargetsVisitor;

        impl TargetsVisitor {
            fn one(id: impl fmt::Display) -> Targets {
                Targets(vec![RuleId(id.to_string())])
            }
        }

        impl<'de> Visitor<'de> for TargetsVisitor {
            type Value = Targets;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rule id or a list of rule ids")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Self::one(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Self::one(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Self::one(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Self::one(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Self::one(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Targets(Vec::new()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut ids = Vec::new();
                while let Some(id) = seq.next_element::<RuleId>()? {
                    ids.push(id);
                }
                Ok(Targets(ids))
            }
        }

        deserializer.deserialize_any(TargetsVisitor)
    }
}

impl<'de> Deserialize<'de> for MappingEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = MappingEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from property keys to rule ids")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(MappingEntries::default())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Vec<RuleId>)> = Vec::new();
                let mut positions: HashMap<String, usize> = HashMap::new();
                while let Some((key, targets)) =
                    access.next_entry::<String, Option<Targets>>()?
                {
                    let targets = targets.map(|t| t.0).unwrap_or_default();
                    match positions.get(&key) {
                        Some(&idx) => entries[idx].1 = targets,
                        None => {
                            positions.insert(key.clone(), entries.len());
                            entries.push((key, targets));
                        }
                    }
                }
                Ok(MappingEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub map: Option<MappingEntries>,
}

impl MappingDocument {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path, "property map")
    }

    pub fn entries(&self) -> &[(String, Vec<RuleId>)] {
        self.map.as_ref().map(|m| m.0.as_slice()).unwrap_or_default()
    }
}

/// One operation declared in the typed interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub path: String,
    pub method: String,
    pub operation_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationObject {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub post: Option<OperationObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypedApiDocument {
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
}

impl TypedApiDocument {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path, "typed API document")
    }

    /// POST operations, in path order. Paths without a POST operationId
    /// contribute nothing.
    pub fn post_operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        for (path, item) in &self.paths {
            match item.post.as_ref().and_then(|op| op.operation_id.as_ref()) {
                Some(id) => ops.push(Operation {
                    path: path.clone(),
                    method: "post".to_string(),
                    operation_id: id.clone(),
                }),
                None => log::debug!("typed path {path} declares no POST operationId"),
            }
        }
        ops
    }

    pub fn operation_ids(&self) -> BTreeSet<String> {
        self.post_operations()
            .into_iter()
            .map(|op| op.operation_id)
            .collect()
    }
}
