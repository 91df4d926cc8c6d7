//! Tests for coverage expansion and identifier decoding over the sample catalog.

use std::collections::HashSet;

use catalog_common::{CoverageCategory, Decade, Scenario, YearPeriod};
use coverage_catalog::{
    expand_catalog, generate_coverages, generate_siblings, get_coverage, get_forecast_coverage,
    get_forecast_coverage_configuration_by_identifier, get_historical_coverage,
    get_historical_coverage_configuration_by_identifier, ConfigurationStore, Coverage, Section,
};
use test_utils::{counts, ids, sample_catalog, FORECAST_MODELS};

fn configuration(identifier: &str) -> coverage_catalog::CoverageConfiguration {
    sample_catalog()
        .configurations()
        .into_iter()
        .find(|c| c.identifier() == identifier)
        .unwrap_or_else(|| panic!("missing configuration {}", identifier))
}

// ============================================================================
// Expansion tests
// ============================================================================

#[test]
fn test_cardinality_per_configuration() {
    let expected = [
        (ids::FORECAST_TAS_SEASONAL, counts::FORECAST_TAS_SEASONAL),
        (ids::FORECAST_TAS_ANNUAL, counts::FORECAST_TAS_ANNUAL),
        (ids::HISTORICAL_TDD, counts::HISTORICAL_TDD),
        (ids::HISTORICAL_TAS_NORMAL, counts::HISTORICAL_TAS_NORMAL),
        (ids::HISTORICAL_TAS_DECADES, counts::HISTORICAL_TAS_DECADES),
    ];
    for (identifier, count) in expected {
        assert_eq!(
            generate_coverages(&configuration(identifier)).len(),
            count,
            "{}",
            identifier
        );
    }
}

#[test]
fn test_expand_catalog_covers_every_configuration() {
    let catalog = sample_catalog();
    let coverages = expand_catalog(&catalog);
    assert_eq!(coverages.len(), counts::TOTAL);

    let unique: HashSet<String> = coverages.iter().map(Coverage::identifier).collect();
    assert_eq!(unique.len(), counts::TOTAL);

    // forecast configurations come first
    let first_historical = coverages
        .iter()
        .position(|c| c.category() == CoverageCategory::Historical)
        .unwrap();
    assert!(coverages[first_historical..]
        .iter()
        .all(|c| c.category() == CoverageCategory::Historical));
}

#[test]
fn test_expand_catalog_is_deterministic() {
    let catalog = sample_catalog();
    let first: Vec<String> = expand_catalog(&catalog).iter().map(Coverage::identifier).collect();
    let second: Vec<String> = expand_catalog(&catalog).iter().map(Coverage::identifier).collect();
    assert_eq!(first, second);
}

#[test]
fn test_historical_winter_summer_end_to_end() {
    let coverages = generate_coverages(&configuration(ids::HISTORICAL_TDD));
    let identifiers: Vec<String> = coverages.iter().map(Coverage::identifier).collect();
    assert_eq!(
        identifiers,
        vec![
            "historical-tdd-absolute-annual-arpa_v-winter_summer-winter",
            "historical-tdd-absolute-annual-arpa_v-winter_summer-summer",
        ]
    );

    let (head_a, tail_a) = identifiers[0].rsplit_once('-').unwrap();
    let (head_b, tail_b) = identifiers[1].rsplit_once('-').unwrap();
    assert_eq!(head_a, head_b);
    assert_ne!(tail_a, tail_b);
}

#[test]
fn test_section_flags_do_not_affect_expansion() {
    let catalog = sample_catalog();
    let simple: Vec<String> = catalog
        .configurations_in_section(Section::Simple)
        .iter()
        .map(|c| c.identifier())
        .collect();
    assert!(!simple.contains(&ids::FORECAST_TAS_ANNUAL.to_string()));
    assert_eq!(catalog.configurations_in_section(Section::Advanced).len(), 5);

    // hidden from the simple section, still fully expanded
    assert_eq!(
        generate_coverages(&configuration(ids::FORECAST_TAS_ANNUAL)).len(),
        counts::FORECAST_TAS_ANNUAL
    );
}

// ============================================================================
// Sibling tests
// ============================================================================

#[test]
fn test_siblings_share_everything_but_model() {
    let coverages = generate_coverages(&configuration(ids::FORECAST_TAS_SEASONAL));
    for coverage in coverages.iter().step_by(7) {
        let Coverage::Forecast(forecast) = coverage else {
            panic!("expected forecast coverage");
        };
        let siblings = generate_siblings(coverage);
        assert_eq!(siblings.len(), FORECAST_MODELS.len() - 1);
        assert!(!siblings.contains(coverage));

        for sibling in &siblings {
            let Coverage::Forecast(sibling) = sibling else {
                panic!("expected forecast sibling");
            };
            assert_ne!(sibling.model.name, forecast.model.name);
            assert_eq!(sibling.scenario, forecast.scenario);
            assert_eq!(sibling.time_window, forecast.time_window);
            assert_eq!(sibling.year_period, forecast.year_period);
            assert_eq!(sibling.configuration, forecast.configuration);
        }
    }
}

#[test]
fn test_siblings_follow_group_order() {
    let coverages = generate_coverages(&configuration(ids::FORECAST_TAS_ANNUAL));
    let last_model = coverages.last().unwrap();
    let names: Vec<String> = generate_siblings(last_model)
        .iter()
        .map(|c| match c {
            Coverage::Forecast(f) => f.model.name.clone(),
            Coverage::Historical(_) => unreachable!(),
        })
        .collect();
    assert_eq!(names, FORECAST_MODELS[..3].to_vec());
}

// ============================================================================
// Identifier round-trip tests
// ============================================================================

#[test]
fn test_every_expanded_coverage_decodes_to_itself() {
    let catalog = sample_catalog();
    for coverage in expand_catalog(&catalog) {
        let decoded = get_coverage(&catalog, &coverage.identifier());
        assert_eq!(decoded.as_ref(), Some(&coverage), "{}", coverage.identifier());
    }
}

#[test]
fn test_decode_forecast_fields() {
    let catalog = sample_catalog();
    let coverage = get_forecast_coverage(
        &catalog,
        "forecast-tas-anomaly-30yr-arpa_vfvg-seasons-all_forecast_models-ec_earth_racmo22e-rcp45-tw2-autumn",
    )
    .unwrap();
    assert_eq!(coverage.model.name, "ec_earth_racmo22e");
    assert_eq!(coverage.scenario, Scenario::Rcp45);
    assert_eq!(coverage.time_window.unwrap().name, "tw2");
    assert_eq!(coverage.year_period, YearPeriod::Autumn);
}

#[test]
fn test_decode_historical_with_reference_period() {
    let catalog = sample_catalog();
    let coverage = get_historical_coverage(
        &catalog,
        "historical-tas-absolute-annual-arpa_v-only_year-climate_standard_normal_1991_2020-all_year",
    )
    .unwrap();
    assert_eq!(coverage.configuration.identifier(), ids::HISTORICAL_TAS_NORMAL);
    assert_eq!(coverage.decade, None);
}

#[test]
fn test_decode_historical_with_decade() {
    let catalog = sample_catalog();
    let coverage = get_historical_coverage(
        &catalog,
        "historical-tas-absolute-10yr-arpa_v-seasons-summer-decade_2011_2020",
    )
    .unwrap();
    assert_eq!(coverage.year_period, YearPeriod::Summer);
    assert_eq!(coverage.decade, Some(Decade::Decade2011_2020));
}

#[test]
fn test_decode_misses_return_none() {
    let catalog = sample_catalog();
    let misses = [
        // unknown category
        "observation-tdd-absolute-annual-arpa_v-winter_summer-winter",
        // unknown indicator
        "historical-tx-absolute-annual-arpa_v-winter_summer-winter",
        // unknown region
        "historical-tdd-absolute-annual-arpa_x-winter_summer-winter",
        // year period outside its group
        "historical-tdd-absolute-annual-arpa_v-winter_summer-spring",
        // unparsable year period
        "historical-tdd-absolute-annual-arpa_v-winter_summer-monsoon",
        // decade on a configuration without decades
        "historical-tdd-absolute-annual-arpa_v-winter_summer-winter-decade_1991_2000",
        // missing decade on a configuration with decades
        "historical-tas-absolute-10yr-arpa_v-seasons-summer",
        // decade not offered by the configuration
        "historical-tas-absolute-10yr-arpa_v-seasons-summer-decade_1961_1970",
        // model outside the group
        "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_forecast_models-cmcc_cclm-rcp45-all_year",
        // scenario not offered
        "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_forecast_models-model_ensemble-rcp26-all_year",
        // time window on a configuration without time windows
        "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_forecast_models-model_ensemble-rcp45-tw1-all_year",
        // missing time window
        "forecast-tas-anomaly-30yr-arpa_vfvg-seasons-all_forecast_models-model_ensemble-rcp45-winter",
        // truncated
        "forecast-tas-anomaly-30yr-arpa_vfvg-seasons-all_forecast_models",
        "",
    ];
    for identifier in misses {
        assert!(get_coverage(&catalog, identifier).is_none(), "{}", identifier);
    }
}

#[test]
fn test_decode_configurations() {
    let catalog = sample_catalog();
    assert!(get_forecast_coverage_configuration_by_identifier(&catalog, ids::FORECAST_TAS_SEASONAL).is_some());
    assert!(get_historical_coverage_configuration_by_identifier(&catalog, ids::HISTORICAL_TDD).is_some());
    assert!(
        get_historical_coverage_configuration_by_identifier(&catalog, ids::HISTORICAL_TAS_NORMAL)
            .is_some()
    );
    assert!(get_historical_coverage_configuration_by_identifier(
        &catalog,
        "historical-tas-absolute-annual-arpa_v-only_year-climate_standard_normal_1961_1990"
    )
    .is_none());
    assert!(get_forecast_coverage_configuration_by_identifier(&catalog, ids::HISTORICAL_TDD).is_none());
}

#[test]
fn test_store_works_through_trait_object() {
    let catalog = sample_catalog();
    let store: &dyn ConfigurationStore = &catalog;
    assert!(get_coverage(store, "historical-tdd-absolute-annual-arpa_v-winter_summer-summer").is_some());
    assert_eq!(expand_catalog(store).len(), counts::TOTAL);
}
