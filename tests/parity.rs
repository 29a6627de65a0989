// Property and typed parity over documents loaded from disk.
mod support;

use anyhow::Result;
use engraving_parity::{
    MappingDocument, MappingTable, ParityConfig, PropertyListDocument, PropertyName, Registry,
    RuleId, TypedApiDocument, check_property_parity, check_typed_parity, harvest,
};
use tempfile::TempDir;

use support::{FixtureRepo, write_file};

fn load_property_inputs(
    repo: &FixtureRepo,
) -> Result<(Vec<PropertyName>, MappingTable, Registry)> {
    let config = ParityConfig::for_root(repo.root());
    let registry = Registry::load(&config.registry)?;
    let properties = PropertyListDocument::load(&config.properties)?.properties;
    let table = MappingTable::from_document(&MappingDocument::load(&config.property_map)?);
    Ok((properties, table, registry))
}

#[test]
fn unmapped_property_fails_parity() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["R1", "R2"])?
        .with_properties(&["note_head_style", "bogus_prop"])?
        .with_map("map:\n  note_head_style: [R1]\n")?;
    let (properties, table, registry) = load_property_inputs(&repo)?;

    let report = check_property_parity(&properties, &table, &registry);
    assert_eq!(report.missing_properties, vec![PropertyName::from("bogus_prop")]);
    assert!(report.invalid_targets.is_empty());
    assert!(!report.is_ok());
    Ok(())
}

#[test]
fn pattern_target_missing_from_registry_is_invalid() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["R1"])?
        .with_properties(&["color_override"])?
        .with_map("map:\n  /^color/i: [R9]\n")?;
    let (properties, table, registry) = load_property_inputs(&repo)?;

    let report = check_property_parity(&properties, &table, &registry);
    assert!(report.missing_properties.is_empty());
    assert_eq!(report.invalid_targets.len(), 1);
    assert_eq!(report.invalid_targets[0].property.as_str(), "color_override");
    assert_eq!(report.invalid_targets[0].rule_id.as_str(), "R9");
    Ok(())
}

#[test]
fn exact_key_overrides_broader_pattern() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["R1", "R2"])?
        .with_properties(&["thickness", "thick_stroke"])?
        .with_map("map:\n  /thick.*/: [R2]\n  thickness: [R1]\n")?;
    let (properties, table, registry) = load_property_inputs(&repo)?;

    assert_eq!(table.resolve("thickness"), &[RuleId::from("R1")]);
    assert_eq!(table.resolve("thick_stroke"), &[RuleId::from("R2")]);
    assert!(check_property_parity(&properties, &table, &registry).is_ok());
    Ok(())
}

#[test]
fn pattern_order_in_document_is_the_tie_break() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["GENERIC", "BEAM"])?
        .with_properties(&["beam_thickness"])?
        .with_map("map:\n  /thickness/: [GENERIC]\n  /^beam_thickness$/: [BEAM]\n")?;
    let (_, table, _) = load_property_inputs(&repo)?;
    assert_eq!(table.resolve("beam_thickness"), &[RuleId::from("GENERIC")]);
    Ok(())
}

#[test]
fn numeric_rule_ids_match_between_registry_and_map() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["101", "R2"])?
        .with_properties(&["x", "y"])?
        .with_map("map:\n  x: [101]\n  y: 101\n")?;
    let (properties, table, registry) = load_property_inputs(&repo)?;

    assert_eq!(table.resolve("x"), &[RuleId::from("101")]);
    assert!(registry.contains("101"));
    assert!(check_property_parity(&properties, &table, &registry).is_ok());
    Ok(())
}

#[test]
fn malformed_pattern_does_not_block_the_run() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["R1"])?
        .with_properties(&["stem_length"])?
        .with_map("map:\n  \"/stem[/\": [R1]\n  /^stem/: [R1]\n")?;
    let (properties, table, registry) = load_property_inputs(&repo)?;

    assert_eq!(table.rejected().len(), 1);
    assert!(check_property_parity(&properties, &table, &registry).is_ok());
    Ok(())
}

#[test]
fn typed_parity_reports_rules_without_operations() -> Result<()> {
    let repo = FixtureRepo::new()?
        .with_registry(&["R2", "R1"])?
        .with_typed(&["R1"])?;
    let config = ParityConfig::for_root(repo.root());
    let registry = Registry::load(&config.registry)?;
    let typed = TypedApiDocument::load(&config.typed_api)?;

    let report = check_typed_parity(&registry, &typed.operation_ids());
    assert_eq!(report.missing_operations, vec![RuleId::from("R2")]);
    Ok(())
}

#[test]
fn empty_harvest_passes_any_mapping() -> Result<()> {
    let tree = TempDir::new()?;
    let properties = harvest(tree.path());
    assert!(properties.is_empty());

    let table = MappingTable::from_entries(vec![(
        "/.*/".to_string(),
        vec![RuleId::from("UNREGISTERED")],
    )]);
    let registry = Registry::new(Vec::new())?;
    assert!(check_property_parity(&properties, &table, &registry).is_ok());
    Ok(())
}

#[test]
fn harvested_list_round_trips_through_the_document() -> Result<()> {
    let tree = TempDir::new()?;
    write_file(tree.path(), "scm/a.scm", "(ly:grob-property g 'beam-gap)\n")?;
    let out = TempDir::new()?;
    let path = out.path().join("coverage/grob_properties.yaml");

    PropertyListDocument {
        properties: harvest(tree.path()),
    }
    .write(&path)?;
    let loaded = PropertyListDocument::load(&path)?;
    assert_eq!(loaded.properties, vec![PropertyName::from("beam_gap")]);
    Ok(())
}

#[test]
fn duplicate_registry_ids_are_rejected() -> Result<()> {
    let repo = FixtureRepo::new()?;
    write_file(
        repo.root(),
        engraving_parity::config::DEFAULT_REGISTRY_PATH,
        "rules:\n  - id: R1\n  - id: R1\n",
    )?;
    let err = Registry::load(&ParityConfig::for_root(repo.root()).registry).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate rule id R1"));
    Ok(())
}
