//! Serializable catalog definitions.
//!
//! A definition references indicators, regions and groups by name; the
//! [`InMemoryCatalog`](crate::InMemoryCatalog) resolves those references when
//! the definition is loaded.

use catalog_common::{Decade, ReferencePeriod, Scenario};
use serde::{Deserialize, Serialize};

use crate::model::{
    ClimaticIndicator, DatasetTemplates, ForecastModelGroup, ForecastTimeWindow, SectionFlags,
    SpatialRegion, YearPeriodGroup,
};

/// Whole catalog as stored in a configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub indicators: Vec<ClimaticIndicator>,
    #[serde(default)]
    pub spatial_regions: Vec<SpatialRegion>,
    #[serde(default)]
    pub year_period_groups: Vec<YearPeriodGroup>,
    #[serde(default)]
    pub model_groups: Vec<ForecastModelGroup>,
    #[serde(default)]
    pub time_windows: Vec<ForecastTimeWindow>,
    #[serde(default)]
    pub forecast_configurations: Vec<ForecastConfigurationDefinition>,
    #[serde(default)]
    pub historical_configurations: Vec<HistoricalConfigurationDefinition>,
}

/// Forecast configuration with references by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfigurationDefinition {
    /// Indicator identifier (`name-measureType-aggregationPeriod`)
    pub indicator: String,
    pub spatial_region: String,
    pub year_period_group: String,
    pub model_group: String,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub time_windows: Vec<String>,
    pub templates: DatasetTemplates,
    #[serde(flatten)]
    pub sections: SectionFlags,
}

/// Historical configuration with references by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalConfigurationDefinition {
    /// Indicator identifier (`name-measureType-aggregationPeriod`)
    pub indicator: String,
    pub spatial_region: String,
    pub year_period_group: String,
    #[serde(default)]
    pub reference_period: Option<ReferencePeriod>,
    #[serde(default)]
    pub decades: Vec<Decade>,
    pub templates: DatasetTemplates,
    #[serde(flatten)]
    pub sections: SectionFlags,
}
