//! Configuration records describing families of coverages.
//!
//! Configurations are read-only from the catalog's point of view: they are
//! built once by the store and shared behind `Arc`.

use std::sync::Arc;

use catalog_common::{
    AggregationPeriod, CoverageCategory, Decade, MeasureType, ReferencePeriod, Scenario,
    YearPeriod, IDENTIFIER_SEPARATOR,
};
use serde::{Deserialize, Serialize};

/// A climatic indicator, identified by `name-measureType-aggregationPeriod`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimaticIndicator {
    /// Short name (e.g., "tas", "tdd")
    pub name: String,
    pub measure_type: MeasureType,
    pub aggregation_period: AggregationPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ClimaticIndicator {
    pub fn new(
        name: impl Into<String>,
        measure_type: MeasureType,
        aggregation_period: AggregationPeriod,
    ) -> Self {
        Self {
            name: name.into(),
            measure_type,
            aggregation_period,
            display_name: None,
            unit: None,
        }
    }

    /// Full identifier: `name-measureType-aggregationPeriod`.
    pub fn identifier(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.name,
            self.measure_type,
            self.aggregation_period,
            sep = IDENTIFIER_SEPARATOR
        )
    }
}

/// Spatial region a configuration covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialRegion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SpatialRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }
}

/// Ordered set of year periods shared across configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPeriodGroup {
    pub name: String,
    pub year_periods: Vec<YearPeriod>,
}

impl YearPeriodGroup {
    pub fn new(name: impl Into<String>, year_periods: Vec<YearPeriod>) -> Self {
        Self {
            name: name.into(),
            year_periods,
        }
    }

    pub fn contains(&self, year_period: YearPeriod) -> bool {
        self.year_periods.contains(&year_period)
    }
}

/// A forecast model (ensemble or single RCM member).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastModel {
    pub name: String,
    /// Path fragment substituted for `{forecast_model_base_path}`
    pub base_path: String,
    /// Path fragment for `{forecast_model_uncertainties_base_path}`;
    /// falls back to `base_path` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainties_base_path: Option<String>,
}

impl ForecastModel {
    pub fn new(name: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            uncertainties_base_path: None,
        }
    }

    pub fn uncertainties_base_path(&self) -> &str {
        self.uncertainties_base_path
            .as_deref()
            .unwrap_or(&self.base_path)
    }
}

/// Ordered group of forecast models that can be overlaid on one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastModelGroup {
    pub name: String,
    pub models: Vec<ForecastModel>,
}

impl ForecastModelGroup {
    pub fn new(name: impl Into<String>, models: Vec<ForecastModel>) -> Self {
        Self {
            name: name.into(),
            models,
        }
    }

    pub fn model(&self, name: &str) -> Option<&ForecastModel> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// Future time window a forecast is aggregated over (e.g., "tw1").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastTimeWindow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ForecastTimeWindow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }
}

/// String templates locating a coverage's datasets.
///
/// Only the main variable and URL are mandatory. Absent optional templates
/// mean the corresponding dataset does not exist for this configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetTemplates {
    /// In-file variable name of the main dataset
    pub main_variable: String,
    /// Remote URL path of the main dataset
    pub main_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_uncertainty_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_uncertainty_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_uncertainty_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_uncertainty_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wms_main_layer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wms_secondary_layer_name: Option<String>,
}

impl DatasetTemplates {
    pub fn new(main_variable: impl Into<String>, main_url: impl Into<String>) -> Self {
        Self {
            main_variable: main_variable.into(),
            main_url: main_url.into(),
            ..Default::default()
        }
    }
}

/// Navigation section a configuration may be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Simple,
    Advanced,
}

/// Visibility flags. They gate navigation menus, never coverage existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFlags {
    #[serde(default = "default_true")]
    pub include_in_simple_section_combinations: bool,
    #[serde(default = "default_true")]
    pub include_in_advanced_section_combinations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SectionFlags {
    fn default() -> Self {
        Self {
            include_in_simple_section_combinations: true,
            include_in_advanced_section_combinations: true,
        }
    }
}

impl SectionFlags {
    pub fn includes(&self, section: Section) -> bool {
        match section {
            Section::Simple => self.include_in_simple_section_combinations,
            Section::Advanced => self.include_in_advanced_section_combinations,
        }
    }
}

/// Configuration of a family of forecast coverages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCoverageConfiguration {
    pub indicator: ClimaticIndicator,
    pub spatial_region: SpatialRegion,
    pub year_period_group: YearPeriodGroup,
    pub model_group: ForecastModelGroup,
    pub scenarios: Vec<Scenario>,
    /// Optional axis; empty means coverages carry no time window
    pub time_windows: Vec<ForecastTimeWindow>,
    pub templates: DatasetTemplates,
    pub sections: SectionFlags,
}

impl ForecastCoverageConfiguration {
    /// `forecast-{indicator}-{region}-{yearPeriodGroup}-{modelGroup}`
    pub fn identifier(&self) -> String {
        let indicator = self.indicator.identifier();
        [
            CoverageCategory::Forecast.as_str(),
            indicator.as_str(),
            self.spatial_region.name.as_str(),
            self.year_period_group.name.as_str(),
            self.model_group.name.as_str(),
        ]
        .join("-")
    }

    pub fn time_window(&self, name: &str) -> Option<&ForecastTimeWindow> {
        self.time_windows.iter().find(|tw| tw.name == name)
    }
}

/// Configuration of a family of historical coverages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalCoverageConfiguration {
    pub indicator: ClimaticIndicator,
    pub spatial_region: SpatialRegion,
    pub year_period_group: YearPeriodGroup,
    /// Fixed single-value axis; part of the configuration identifier
    pub reference_period: Option<ReferencePeriod>,
    /// Optional axis; empty means coverages carry no decade
    pub decades: Vec<Decade>,
    pub templates: DatasetTemplates,
    pub sections: SectionFlags,
}

impl HistoricalCoverageConfiguration {
    /// `historical-{indicator}-{region}-{yearPeriodGroup}[-{referencePeriod}]`
    pub fn identifier(&self) -> String {
        let indicator = self.indicator.identifier();
        let mut parts = vec![
            CoverageCategory::Historical.as_str(),
            indicator.as_str(),
            self.spatial_region.name.as_str(),
            self.year_period_group.name.as_str(),
        ];
        if let Some(reference_period) = &self.reference_period {
            parts.push(reference_period.as_str());
        }
        parts.join("-")
    }
}

/// Either kind of configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageConfiguration {
    Forecast(Arc<ForecastCoverageConfiguration>),
    Historical(Arc<HistoricalCoverageConfiguration>),
}

impl CoverageConfiguration {
    pub fn identifier(&self) -> String {
        match self {
            CoverageConfiguration::Forecast(c) => c.identifier(),
            CoverageConfiguration::Historical(c) => c.identifier(),
        }
    }

    pub fn category(&self) -> CoverageCategory {
        match self {
            CoverageConfiguration::Forecast(_) => CoverageCategory::Forecast,
            CoverageConfiguration::Historical(_) => CoverageCategory::Historical,
        }
    }

    pub fn sections(&self) -> SectionFlags {
        match self {
            CoverageConfiguration::Forecast(c) => c.sections,
            CoverageConfiguration::Historical(c) => c.sections,
        }
    }

    pub fn indicator(&self) -> &ClimaticIndicator {
        match self {
            CoverageConfiguration::Forecast(c) => &c.indicator,
            CoverageConfiguration::Historical(c) => &c.indicator,
        }
    }
}
