//! Human-readable rendering of parity reports.

use crate::parity::{PropertyParityReport, TypedParityReport};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt::Display;
use std::fmt::Write;

/// Entries listed per section before the listing is truncated.
pub const EXAMPLE_LIMIT: usize = 50;

pub const PROPERTY_PARITY_OK: &str =
    "Property parity OK - all grob properties map to declared rules.";
pub const TYPED_PARITY_OK: &str = "Typed parity OK - all rules present as typed operations.";

fn push_bounded<T: Display>(out: &mut String, items: &[T]) {
    for item in items.iter().take(EXAMPLE_LIMIT) {
        let _ = writeln!(out, "  - {item}");
    }
    if items.len() > EXAMPLE_LIMIT {
        let _ = writeln!(out, "  ... and {} more", items.len() - EXAMPLE_LIMIT);
    }
}

pub fn render_property_report(report: &PropertyParityReport) -> String {
    if report.is_ok() {
        return format!("{PROPERTY_PARITY_OK}\n");
    }
    let mut out = String::from("PROPERTY PARITY FAILED\n");
    if !report.missing_properties.is_empty() {
        let _ = writeln!(
            out,
            "Unmapped properties: {}",
            report.missing_properties.len()
        );
        push_bounded(&mut out, &report.missing_properties);
    }
    if !report.invalid_targets.is_empty() {
        let _ = writeln!(
            out,
            "Invalid rule references: {}",
            report.invalid_targets.len()
        );
        let lines: Vec<String> = report
            .invalid_targets
            .iter()
            .map(|t| format!("{} -> {}", t.property, t.rule_id))
            .collect();
        push_bounded(&mut out, &lines);
    }
    out
}

pub fn render_typed_report(report: &TypedParityReport) -> String {
    if report.is_ok() {
        return format!("{TYPED_PARITY_OK}\n");
    }
    let mut out = String::from("TYPED PARITY FAILED\n");
    let _ = writeln!(
        out,
        "Typed OpenAPI missing operations for rules: {}",
        report.missing_operations.len()
    );
    push_bounded(&mut out, &report.missing_operations);
    out
}

/// Serialize a report as a JSON object carrying an `ok` verdict.
fn json_with_verdict<T: Serialize>(report: &T, ok: bool) -> Result<String> {
    let mut value = serde_json::to_value(report).context("serializing parity report")?;
    if let Value::Object(fields) = &mut value {
        fields.insert("ok".to_string(), json!(ok));
    }
    serde_json::to_string_pretty(&value).context("rendering parity report")
}

pub fn property_report_json(report: &PropertyParityReport) -> Result<String> {
    json_with_verdict(report, report.is_ok())
}

pub fn typed_report_json(report: &TypedParityReport) -> Result<String> {
    json_with_verdict(report, report.is_ok())
}
