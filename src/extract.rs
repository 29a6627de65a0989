//! Grob property harvester.
//!
//! Scans a LilyPond source tree with surface-syntax patterns; nothing is
//! parsed. Two kinds of rules feed one accumulating set:
//!
//! - canonical-definition rules, applied only to
//!   `scm/define-grob-properties.scm` (at any depth), cover the two historical
//!   declaration syntaxes;
//! - usage-site rules, applied to every file, catch properties read or
//!   overridden by name at call sites.
//!
//! Symlinks are followed. Files that cannot be read are skipped with a log
//! line; invalid UTF-8 is replaced rather than dropping the whole file. The
//! result is normalized (`-` becomes `_`), deduplicated and sorted, so it does
//! not depend on directory iteration order.

use crate::identity::PropertyName;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Trailing path components of the canonical property-definition file.
pub const CANONICAL_DEFINITION_FILE: [&str; 2] = ["scm", "define-grob-properties.scm"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RulePhase {
    CanonicalDefinition,
    UsageSite,
}

/// One named extraction pattern. Capture group 1 is the raw property name.
#[derive(Debug)]
pub struct ExtractionRule {
    pub name: &'static str,
    pub phase: RulePhase,
    pub pattern: Regex,
}

static RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    [
        (
            "paren-name-type",
            RulePhase::CanonicalDefinition,
            r#"\(\s*([A-Za-z0-9_-]+)\s*,\s*symbol[-A-Za-z0-9_?]+\s+""#,
        ),
        (
            "define-grob-property",
            RulePhase::CanonicalDefinition,
            r"define-grob-property\s+'([A-Za-z0-9_-]+)'",
        ),
        (
            "grob-property",
            RulePhase::UsageSite,
            r"grob-property\s+[^']*'([A-Za-z0-9_-]+)",
        ),
        (
            "ly:grob-property",
            RulePhase::UsageSite,
            r"ly:grob-property\s+[^']*'([A-Za-z0-9_-]+)",
        ),
        (
            "make-grob-property-override",
            RulePhase::UsageSite,
            r"make-grob-property-override\s+[^']*'([A-Za-z0-9_-]+)",
        ),
    ]
    .into_iter()
    .map(|(name, phase, pattern)| ExtractionRule {
        name,
        phase,
        pattern: Regex::new(pattern).expect("extraction patterns are valid"),
    })
    .collect()
});

/// The fixed extraction rule set, canonical-definition rules first.
pub fn extraction_rules() -> &'static [ExtractionRule] {
    &RULES
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Restrict the usage-site phase to these extensions (without the dot).
    /// `None` scans every file. Canonical definition files are always read.
    pub extensions: Option<BTreeSet<String>>,
}

impl HarvestOptions {
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            extensions: if set.is_empty() { None } else { Some(set) },
        }
    }

    fn scans_usage(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(allowed) => path
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| allowed.contains(ext))
                .unwrap_or(false),
        }
    }
}

pub fn is_canonical_definition_file(path: &Path) -> bool {
    path.ends_with(CANONICAL_DEFINITION_FILE.iter().collect::<PathBuf>())
}

/// Harvest every property name under `root`, scanning all files.
pub fn harvest(root: &Path) -> Vec<PropertyName> {
    harvest_with(root, &HarvestOptions::default())
}

pub fn harvest_with(root: &Path, options: &HarvestOptions) -> Vec<PropertyName> {
    let mut found: BTreeSet<PropertyName> = BTreeSet::new();
    let mut hits: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut scanned = 0usize;

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let canonical = is_canonical_definition_file(path);
        let usage = options.scans_usage(path);
        if !canonical && !usage {
            continue;
        }
        let Some(text) = read_source(path) else {
            continue;
        };
        scanned += 1;

        for rule in extraction_rules() {
            let applies = match rule.phase {
                RulePhase::CanonicalDefinition => canonical,
                RulePhase::UsageSite => usage,
            };
            if !applies {
                continue;
            }
            for caps in rule.pattern.captures_iter(&text) {
                if let Some(raw) = caps.get(1) {
                    found.insert(PropertyName::normalize(raw.as_str()));
                    *hits.entry(rule.name).or_default() += 1;
                }
            }
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        for (rule, count) in &hits {
            log::debug!("rule {rule}: {count} matches");
        }
    }
    log::info!(
        "harvested {} properties from {} files under {}",
        found.len(),
        scanned,
        root.display()
    );
    found.into_iter().collect()
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("decoding {} lossily: {}", path.display(), err.utf8_error());
                Some(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        },
        Err(err) => {
            log::warn!("skipping unreadable file {}: {err}", path.display());
            None
        }
    }
}
