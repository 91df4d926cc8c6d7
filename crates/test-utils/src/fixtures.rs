//! Common test fixtures for the coverage catalog.
//!
//! The sample catalog mirrors a small slice of a real deployment: one
//! seasonal anomaly forecast with uncertainty bands, one annual forecast
//! without them, and three historical configurations covering the
//! plain, reference-period and decade shapes.

use catalog_common::{
    AggregationPeriod, Decade, DownloadGrid, MeasureType, ReferencePeriod, Scenario, YearPeriod,
};
use coverage_catalog::{
    CatalogDefinition, ClimaticIndicator, DatasetTemplates, ForecastConfigurationDefinition,
    ForecastModel, ForecastModelGroup, ForecastTimeWindow, HistoricalConfigurationDefinition,
    InMemoryCatalog, SectionFlags, SpatialRegion, YearPeriodGroup,
};

/// Identifiers of the configurations in [`sample_catalog`].
pub mod ids {
    pub const FORECAST_TAS_SEASONAL: &str =
        "forecast-tas-anomaly-30yr-arpa_vfvg-seasons-all_forecast_models";
    pub const FORECAST_TAS_ANNUAL: &str =
        "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_forecast_models";
    pub const HISTORICAL_TDD: &str = "historical-tdd-absolute-annual-arpa_v-winter_summer";
    pub const HISTORICAL_TAS_NORMAL: &str =
        "historical-tas-absolute-annual-arpa_v-only_year-climate_standard_normal_1991_2020";
    pub const HISTORICAL_TAS_DECADES: &str = "historical-tas-absolute-10yr-arpa_v-seasons";
}

/// Coverage counts per configuration in [`sample_catalog`].
pub mod counts {
    /// 4 models x 3 scenarios x 2 time windows x 4 seasons
    pub const FORECAST_TAS_SEASONAL: usize = 96;
    /// 4 models x 2 scenarios x 1 year period
    pub const FORECAST_TAS_ANNUAL: usize = 8;
    pub const HISTORICAL_TDD: usize = 2;
    pub const HISTORICAL_TAS_NORMAL: usize = 1;
    /// 4 seasons x 3 decades
    pub const HISTORICAL_TAS_DECADES: usize = 12;

    pub const TOTAL: usize = FORECAST_TAS_SEASONAL
        + FORECAST_TAS_ANNUAL
        + HISTORICAL_TDD
        + HISTORICAL_TAS_NORMAL
        + HISTORICAL_TAS_DECADES;
}

/// Models of the `all_forecast_models` group, in group order.
pub const FORECAST_MODELS: [&str; 4] = [
    "model_ensemble",
    "ec_earth_cclm4_8_17",
    "ec_earth_racmo22e",
    "hadgem2_es_racmo22e",
];

/// A minimal catalog in YAML form, as read by the loader.
pub const MINIMAL_CATALOG_YAML: &str = r#"
indicators:
  - name: tdd
    measure_type: absolute
    aggregation_period: annual
spatial_regions:
  - name: arpa_v
year_period_groups:
  - name: winter_summer
    year_periods: [winter, summer]
historical_configurations:
  - indicator: tdd-absolute-annual
    spatial_region: arpa_v
    year_period_group: winter_summer
    templates:
      main_variable: "{climatic_indicator}"
      main_url: "historical/{climatic_indicator}_{year_period}.nc"
"#;

/// [`MINIMAL_CATALOG_YAML`], parsed.
pub fn minimal_definition() -> CatalogDefinition {
    serde_yaml::from_str(MINIMAL_CATALOG_YAML).expect("minimal catalog YAML is valid")
}

/// The sample catalog definition.
pub fn sample_definition() -> CatalogDefinition {
    let mut ensemble = ForecastModel::new("model_ensemble", "ensembletwbc/clipped");
    ensemble.uncertainties_base_path = Some("ensembletwbc/std".to_string());

    CatalogDefinition {
        indicators: vec![
            ClimaticIndicator::new("tas", MeasureType::Anomaly, AggregationPeriod::ThirtyYear),
            ClimaticIndicator::new("tas", MeasureType::Absolute, AggregationPeriod::Annual),
            ClimaticIndicator::new("tas", MeasureType::Absolute, AggregationPeriod::TenYear),
            ClimaticIndicator::new("tdd", MeasureType::Absolute, AggregationPeriod::Annual),
        ],
        spatial_regions: vec![SpatialRegion::new("arpa_vfvg"), SpatialRegion::new("arpa_v")],
        year_period_groups: vec![
            YearPeriodGroup::new("only_year", vec![YearPeriod::AllYear]),
            YearPeriodGroup::new(
                "seasons",
                vec![
                    YearPeriod::Winter,
                    YearPeriod::Spring,
                    YearPeriod::Summer,
                    YearPeriod::Autumn,
                ],
            ),
            YearPeriodGroup::new("winter_summer", vec![YearPeriod::Winter, YearPeriod::Summer]),
        ],
        model_groups: vec![ForecastModelGroup::new(
            "all_forecast_models",
            vec![
                ensemble,
                ForecastModel::new("ec_earth_cclm4_8_17", "EC-EARTH_CCLM4-8-17"),
                ForecastModel::new("ec_earth_racmo22e", "EC-EARTH_RACMO22E"),
                ForecastModel::new("hadgem2_es_racmo22e", "HadGEM2-ES_RACMO22E"),
            ],
        )],
        time_windows: vec![ForecastTimeWindow::new("tw1"), ForecastTimeWindow::new("tw2")],
        forecast_configurations: vec![
            ForecastConfigurationDefinition {
                indicator: "tas-anomaly-30yr".to_string(),
                spatial_region: "arpa_vfvg".to_string(),
                year_period_group: "seasons".to_string(),
                model_group: "all_forecast_models".to_string(),
                scenarios: vec![Scenario::Rcp26, Scenario::Rcp45, Scenario::Rcp85],
                time_windows: vec!["tw1".to_string(), "tw2".to_string()],
                templates: DatasetTemplates {
                    main_variable: "{climatic_indicator}".to_string(),
                    main_url: "{forecast_model_base_path}/{climatic_indicator}_anom_pp_ts_{scenario}_{year_period}_{time_window}_ls_VFVG.nc".to_string(),
                    lower_uncertainty_variable: Some("{climatic_indicator}_stdev".to_string()),
                    lower_uncertainty_url: Some("{forecast_model_uncertainties_base_path}/{climatic_indicator}_anom_pp_ts_{scenario}_{year_period}_{time_window}_ls_VFVG.nc".to_string()),
                    upper_uncertainty_variable: Some("{climatic_indicator}_stdev".to_string()),
                    upper_uncertainty_url: Some("{forecast_model_uncertainties_base_path}/{climatic_indicator}_anom_pp_ts_{scenario}_{year_period}_{time_window}_ls_VFVG.nc".to_string()),
                    wms_main_layer_name: Some("{climatic_indicator}-{forecast_model}-{scenario}-{year_period}-{time_window}".to_string()),
                    wms_secondary_layer_name: None,
                },
                sections: SectionFlags::default(),
            },
            ForecastConfigurationDefinition {
                indicator: "tas-absolute-annual".to_string(),
                spatial_region: "arpa_vfvg".to_string(),
                year_period_group: "only_year".to_string(),
                model_group: "all_forecast_models".to_string(),
                scenarios: vec![Scenario::Rcp45, Scenario::Rcp85],
                time_windows: vec![],
                templates: DatasetTemplates {
                    wms_main_layer_name: Some("{climatic_indicator}-{forecast_model}-{scenario}".to_string()),
                    wms_secondary_layer_name: Some("{climatic_indicator}-{forecast_model}-{scenario}-202[34]*".to_string()),
                    ..DatasetTemplates::new(
                        "{climatic_indicator}",
                        "{forecast_model_base_path}/{climatic_indicator}_avgagg_{scenario}_ts19762100_ls_VFVG.nc",
                    )
                },
                sections: SectionFlags {
                    include_in_simple_section_combinations: false,
                    include_in_advanced_section_combinations: true,
                },
            },
        ],
        historical_configurations: vec![
            HistoricalConfigurationDefinition {
                indicator: "tdd-absolute-annual".to_string(),
                spatial_region: "arpa_v".to_string(),
                year_period_group: "winter_summer".to_string(),
                reference_period: None,
                decades: vec![],
                templates: DatasetTemplates::new(
                    "{climatic_indicator}",
                    "historical/{climatic_indicator}_{year_period}_1992_202[34]_py85.nc",
                ),
                sections: SectionFlags::default(),
            },
            HistoricalConfigurationDefinition {
                indicator: "tas-absolute-annual".to_string(),
                spatial_region: "arpa_v".to_string(),
                year_period_group: "only_year".to_string(),
                reference_period: Some(ReferencePeriod::ClimateStandardNormal1991_2020),
                decades: vec![],
                templates: DatasetTemplates::new(
                    "{climatic_indicator}",
                    "historical/{climatic_indicator}_{reference_period}.nc",
                ),
                sections: SectionFlags::default(),
            },
            HistoricalConfigurationDefinition {
                indicator: "tas-absolute-10yr".to_string(),
                spatial_region: "arpa_v".to_string(),
                year_period_group: "seasons".to_string(),
                reference_period: None,
                decades: vec![
                    Decade::Decade1991_2000,
                    Decade::Decade2001_2010,
                    Decade::Decade2011_2020,
                ],
                templates: DatasetTemplates::new(
                    "{climatic_indicator}",
                    "historical/{climatic_indicator}_{year_period}_{decade}.nc",
                ),
                sections: SectionFlags::default(),
            },
        ],
    }
}

/// The sample catalog, loaded.
pub fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_definition(sample_definition()).expect("sample catalog is valid")
}

/// A 0.5 degree download grid from (10, 45) to (12, 47).
pub fn sample_download_grid() -> DownloadGrid {
    DownloadGrid::new(10.0, 45.0, 12.0, 47.0, 4, 4).expect("sample grid is valid")
}

/// Common bounding box definitions for testing, as (min_x, min_y, max_x, max_y).
pub mod bbox {
    /// Inside the sample grid, not aligned with it
    pub const INSIDE: (f64, f64, f64, f64) = (10.2, 45.1, 10.9, 45.6);

    /// Straddles the north-east corner of the sample grid
    pub const OVERLAPPING: (f64, f64, f64, f64) = (11.7, 46.8, 13.0, 48.0);

    /// Nowhere near the sample grid
    pub const OUTSIDE: (f64, f64, f64, f64) = (-100.0, 40.0, -99.0, 41.0);
}
