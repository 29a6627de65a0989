//! Identifier newtypes shared by the harvester, the mapping table, and the
//! parity checkers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A grob property name in canonical form (`_` as the word separator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyName(pub String);

impl PropertyName {
    /// Canonicalize a raw name captured from source text.
    ///
    /// Scheme spells property symbols with dashes; the coverage vocabulary
    /// uses underscores. Case is preserved.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.replace('-', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of an engraving rule as declared in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
