//! Property-to-rule mapping table and its resolver.
//!
//! Keys come in two kinds. A key wrapped in slashes (`/^beam/`, optionally
//! followed by flags as in `/^beam/i`) is a case-insensitive pattern; anything
//! else is an exact property name. Resolution gives exact keys absolute
//! priority, then tries patterns strictly in declaration order and takes the
//! first hit. There is no specificity heuristic: authoring order is the
//! tie-break.

use crate::documents::MappingDocument;
use crate::identity::RuleId;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

const PATTERN_DELIMITER: char = '/';
const PATTERN_FLAGS: &[char] = &['i', 'm', 's', 'x'];

#[derive(Debug, Clone)]
pub enum MappingKey {
    Exact(String),
    Pattern(Regex),
}

impl MappingKey {
    /// Display form of the key. Pattern flags are not retained.
    pub fn source(&self) -> String {
        match self {
            MappingKey::Exact(name) => name.clone(),
            MappingKey::Pattern(regex) => format!("/{}/", regex.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub key: MappingKey,
    pub targets: Vec<RuleId>,
}

/// A pattern key that failed to compile and was left out of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    pub key: String,
    pub error: String,
}

/// Classification of a raw key before compilation.
#[derive(Debug, PartialEq, Eq)]
enum KeySyntax<'a> {
    Exact,
    Pattern { body: &'a str, flags: &'a str },
}

fn classify_key(key: &str) -> KeySyntax<'_> {
    if key.len() < 2 || !key.starts_with(PATTERN_DELIMITER) {
        return KeySyntax::Exact;
    }
    let rest = &key[1..];
    let Some(close) = rest.rfind(PATTERN_DELIMITER) else {
        return KeySyntax::Exact;
    };
    let flags = &rest[close + 1..];
    if !flags.chars().all(|c| PATTERN_FLAGS.contains(&c)) {
        return KeySyntax::Exact;
    }
    KeySyntax::Pattern {
        body: &rest[..close],
        flags,
    }
}

fn compile_pattern(body: &str, flags: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(body)
        .case_insensitive(true)
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
}

/// Ordered mapping entries split into an exact index and a pattern list.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    exact: HashMap<String, usize>,
    patterns: Vec<usize>,
    rejected: Vec<RejectedPattern>,
}

impl MappingTable {
    /// Build a table from declared `(key, targets)` pairs in authoring order.
    ///
    /// Pattern keys that do not compile are dropped with a warning and kept in
    /// [`MappingTable::rejected`]. A repeated exact key keeps its last value.
    pub fn from_entries<I>(declared: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<RuleId>)>,
    {
        let mut table = Self::default();
        for (key, targets) in declared {
            match classify_key(&key) {
                KeySyntax::Exact => match table.exact.get(&key) {
                    Some(&idx) => table.entries[idx].targets = targets,
                    None => {
                        table.exact.insert(key.clone(), table.entries.len());
                        table.entries.push(MappingEntry {
                            key: MappingKey::Exact(key),
                            targets,
                        });
                    }
                },
                KeySyntax::Pattern { body, flags } => match compile_pattern(body, flags) {
                    Ok(regex) => {
                        table.patterns.push(table.entries.len());
                        table.entries.push(MappingEntry {
                            key: MappingKey::Pattern(regex),
                            targets,
                        });
                    }
                    Err(err) => {
                        log::warn!("dropping mapping pattern {key}: {err}");
                        table.rejected.push(RejectedPattern {
                            key,
                            error: err.to_string(),
                        });
                    }
                },
            }
        }
        log::debug!(
            "mapping table: {} exact keys, {} patterns, {} rejected",
            table.exact.len(),
            table.patterns.len(),
            table.rejected.len()
        );
        table
    }

    pub fn from_document(document: &MappingDocument) -> Self {
        Self::from_entries(document.entries().iter().cloned())
    }

    /// Resolve a property name to its target rule ids (empty when unmapped).
    pub fn resolve(&self, name: &str) -> &[RuleId] {
        if let Some(&idx) = self.exact.get(name) {
            return &self.entries[idx].targets;
        }
        self.patterns
            .iter()
            .map(|&idx| &self.entries[idx])
            .find(|entry| match &entry.key {
                MappingKey::Pattern(regex) => regex.is_match(name),
                MappingKey::Exact(_) => false,
            })
            .map(|entry| entry.targets.as_slice())
            .unwrap_or_default()
    }

    /// All accepted entries in declaration order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Accepted pattern entries in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &MappingEntry> {
        self.patterns.iter().map(|&idx| &self.entries[idx])
    }

    pub fn rejected(&self) -> &[RejectedPattern] {
        &self.rejected
    }
}

/// Free-function form of [`MappingTable::resolve`].
pub fn resolve<'t>(name: &str, table: &'t MappingTable) -> &'t [RuleId] {
    table.resolve(name)
}
