//! Parity checks between the rule registry and its two coverage surfaces.
//!
//! Both checks are pure functions of already-loaded inputs and return a fresh
//! report; rendering and exit codes live with the binaries.

use crate::documents::Registry;
use crate::identity::{PropertyName, RuleId};
use crate::mapping::MappingTable;
use serde::Serialize;
use std::collections::BTreeSet;

/// A mapped rule id that the registry does not declare.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct InvalidTarget {
    pub property: PropertyName,
    pub rule_id: RuleId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyParityReport {
    pub missing_properties: Vec<PropertyName>,
    pub invalid_targets: Vec<InvalidTarget>,
}

impl PropertyParityReport {
    pub fn is_ok(&self) -> bool {
        self.missing_properties.is_empty() && self.invalid_targets.is_empty()
    }
}

/// Resolve every property through `table` and check targets against `registry`.
///
/// Properties are visited in input order. Each distinct unregistered
/// `(property, rule)` pair is reported exactly once, even when a mapping lists
/// the same target twice.
pub fn check_property_parity(
    properties: &[PropertyName],
    table: &MappingTable,
    registry: &Registry,
) -> PropertyParityReport {
    let mut report = PropertyParityReport::default();
    let mut seen_invalid: BTreeSet<(&PropertyName, &RuleId)> = BTreeSet::new();

    for property in properties {
        let targets = table.resolve(property.as_str());
        if targets.is_empty() {
            report.missing_properties.push(property.clone());
            continue;
        }
        for rule_id in targets {
            if registry.contains(rule_id.as_str()) {
                continue;
            }
            if seen_invalid.insert((property, rule_id)) {
                report.invalid_targets.push(InvalidTarget {
                    property: property.clone(),
                    rule_id: rule_id.clone(),
                });
            }
        }
    }

    log::debug!(
        "property parity: {} properties, {} unmapped, {} invalid targets",
        properties.len(),
        report.missing_properties.len(),
        report.invalid_targets.len()
    );
    report
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypedParityReport {
    pub missing_operations: Vec<RuleId>,
}

impl TypedParityReport {
    pub fn is_ok(&self) -> bool {
        self.missing_operations.is_empty()
    }
}

/// Rules without a POST operation of the same id, ascending.
pub fn check_typed_parity(registry: &Registry, operations: &BTreeSet<String>) -> TypedParityReport {
    // Registry iteration is already ascending.
    let missing_operations = registry
        .ids()
        .filter(|id| !operations.contains(id.as_str()))
        .cloned()
        .collect();
    TypedParityReport { missing_operations }
}
