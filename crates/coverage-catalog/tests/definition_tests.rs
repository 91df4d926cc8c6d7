//! Tests for loading catalog definitions.

use catalog_common::{CatalogError, Scenario};
use coverage_catalog::{
    expand_catalog, CatalogDefinition, ConfigurationStore, InMemoryCatalog, Section,
};
use test_utils::{sample_definition, MINIMAL_CATALOG_YAML};

fn load(yaml: &str) -> Result<InMemoryCatalog, CatalogError> {
    let definition: CatalogDefinition = serde_yaml::from_str(yaml).expect("valid YAML");
    InMemoryCatalog::from_definition(definition)
}

// ============================================================================
// YAML loading
// ============================================================================

#[test]
fn test_minimal_yaml_catalog() {
    let catalog = load(MINIMAL_CATALOG_YAML).unwrap();
    let configurations = catalog.configurations();
    assert_eq!(configurations.len(), 1);
    assert_eq!(
        configurations[0].identifier(),
        "historical-tdd-absolute-annual-arpa_v-winter_summer"
    );

    // section flags default to visible everywhere
    assert_eq!(catalog.configurations_in_section(Section::Simple).len(), 1);
    assert_eq!(expand_catalog(&catalog).len(), 2);
}

#[test]
fn test_section_flags_from_yaml() {
    let yaml = MINIMAL_CATALOG_YAML.replace(
        "    templates:",
        "    include_in_advanced_section_combinations: false\n    templates:",
    );
    let catalog = load(&yaml).unwrap();
    assert!(catalog.configurations_in_section(Section::Advanced).is_empty());
    assert_eq!(catalog.configurations_in_section(Section::Simple).len(), 1);
}

#[test]
fn test_forecast_without_scenarios_loads_and_expands_to_nothing() {
    let mut definition = sample_definition();
    definition.historical_configurations.clear();
    definition.forecast_configurations.truncate(1);
    definition.forecast_configurations[0].scenarios = Vec::<Scenario>::new();

    let catalog = InMemoryCatalog::from_definition(definition).unwrap();
    assert_eq!(catalog.configurations().len(), 1);
    assert!(expand_catalog(&catalog).is_empty());
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_dash_in_region_name_rejected() {
    let yaml = MINIMAL_CATALOG_YAML.replace("arpa_v", "arpa-v");
    assert!(matches!(load(&yaml), Err(CatalogError::InvalidName { .. })));
}

#[test]
fn test_unknown_year_period_group_rejected() {
    let yaml = MINIMAL_CATALOG_YAML.replace(
        "    year_period_group: winter_summer",
        "    year_period_group: seasons",
    );
    assert!(matches!(
        load(&yaml),
        Err(CatalogError::UnknownReference {
            kind: "year period group",
            ..
        })
    ));
}

#[test]
fn test_duplicate_model_in_group_rejected() {
    let mut definition = sample_definition();
    let first = definition.model_groups[0].models[0].clone();
    definition.model_groups[0].models.push(first);
    assert!(matches!(
        InMemoryCatalog::from_definition(definition),
        Err(CatalogError::Duplicate { kind: "forecast model", .. })
    ));
}

#[test]
fn test_unknown_axis_value_is_a_parse_error() {
    let yaml = MINIMAL_CATALOG_YAML.replace("[winter, summer]", "[winter, monsoon]");
    assert!(serde_yaml::from_str::<CatalogDefinition>(&yaml).is_err());
}
