//! Configuration store.
//!
//! The store is the read-only source of configurations for the codec and
//! the expander. [`InMemoryCatalog`] is the bundled implementation; it
//! validates names and resolves references when definitions are added.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog_common::{validate_segment_name, CatalogError, CatalogResult};
use tracing::{debug, info};

use crate::definition::{
    CatalogDefinition, ForecastConfigurationDefinition, HistoricalConfigurationDefinition,
};
use crate::model::{
    ClimaticIndicator, CoverageConfiguration, ForecastCoverageConfiguration, ForecastModelGroup,
    ForecastTimeWindow, HistoricalCoverageConfiguration, Section, SpatialRegion, YearPeriodGroup,
};

/// Read access to configurations and the entities they reference.
pub trait ConfigurationStore: Send + Sync {
    /// Look up an indicator by its `name-measureType-aggregationPeriod` identifier.
    fn indicator(&self, identifier: &str) -> Option<&ClimaticIndicator>;

    fn spatial_region(&self, name: &str) -> Option<&SpatialRegion>;

    fn year_period_group(&self, name: &str) -> Option<&YearPeriodGroup>;

    fn model_group(&self, name: &str) -> Option<&ForecastModelGroup>;

    fn forecast_configuration(&self, identifier: &str)
        -> Option<Arc<ForecastCoverageConfiguration>>;

    fn historical_configuration(
        &self,
        identifier: &str,
    ) -> Option<Arc<HistoricalCoverageConfiguration>>;

    /// Every configuration, forecast first, each group ordered by identifier.
    fn configurations(&self) -> Vec<CoverageConfiguration>;

    /// Configurations whose inclusion flag for `section` is set.
    fn configurations_in_section(&self, section: Section) -> Vec<CoverageConfiguration> {
        self.configurations()
            .into_iter()
            .filter(|c| c.sections().includes(section))
            .collect()
    }
}

/// In-memory catalog keyed by name / identifier.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    indicators: BTreeMap<String, ClimaticIndicator>,
    spatial_regions: BTreeMap<String, SpatialRegion>,
    year_period_groups: BTreeMap<String, YearPeriodGroup>,
    model_groups: BTreeMap<String, ForecastModelGroup>,
    time_windows: BTreeMap<String, ForecastTimeWindow>,
    forecast_configurations: BTreeMap<String, Arc<ForecastCoverageConfiguration>>,
    historical_configurations: BTreeMap<String, Arc<HistoricalCoverageConfiguration>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a full definition, validating every entry.
    pub fn from_definition(definition: CatalogDefinition) -> CatalogResult<Self> {
        let mut catalog = Self::new();

        for indicator in definition.indicators {
            catalog.add_indicator(indicator)?;
        }
        for region in definition.spatial_regions {
            catalog.add_spatial_region(region)?;
        }
        for group in definition.year_period_groups {
            catalog.add_year_period_group(group)?;
        }
        for group in definition.model_groups {
            catalog.add_model_group(group)?;
        }
        for time_window in definition.time_windows {
            catalog.add_time_window(time_window)?;
        }
        for configuration in definition.forecast_configurations {
            catalog.add_forecast_configuration(configuration)?;
        }
        for configuration in definition.historical_configurations {
            catalog.add_historical_configuration(configuration)?;
        }

        info!(
            forecast = catalog.forecast_configurations.len(),
            historical = catalog.historical_configurations.len(),
            "Loaded coverage catalog"
        );

        Ok(catalog)
    }

    pub fn add_indicator(&mut self, indicator: ClimaticIndicator) -> CatalogResult<()> {
        validate_segment_name(&indicator.name)?;
        insert_unique(&mut self.indicators, "indicator", indicator.identifier(), indicator)
    }

    pub fn add_spatial_region(&mut self, region: SpatialRegion) -> CatalogResult<()> {
        validate_segment_name(&region.name)?;
        insert_unique(&mut self.spatial_regions, "spatial region", region.name.clone(), region)
    }

    pub fn add_year_period_group(&mut self, group: YearPeriodGroup) -> CatalogResult<()> {
        validate_segment_name(&group.name)?;
        insert_unique(&mut self.year_period_groups, "year period group", group.name.clone(), group)
    }

    pub fn add_model_group(&mut self, group: ForecastModelGroup) -> CatalogResult<()> {
        validate_segment_name(&group.name)?;
        for (i, model) in group.models.iter().enumerate() {
            validate_segment_name(&model.name)?;
            if group.models[..i].iter().any(|m| m.name == model.name) {
                return Err(CatalogError::Duplicate {
                    kind: "forecast model",
                    name: format!("{} in group {}", model.name, group.name),
                });
            }
        }
        insert_unique(&mut self.model_groups, "model group", group.name.clone(), group)
    }

    pub fn add_time_window(&mut self, time_window: ForecastTimeWindow) -> CatalogResult<()> {
        validate_segment_name(&time_window.name)?;
        insert_unique(&mut self.time_windows, "time window", time_window.name.clone(), time_window)
    }

    /// Resolve and register a forecast configuration. Returns its identifier.
    pub fn add_forecast_configuration(
        &mut self,
        definition: ForecastConfigurationDefinition,
    ) -> CatalogResult<String> {
        let time_windows = definition
            .time_windows
            .iter()
            .map(|name| {
                self.time_windows
                    .get(name)
                    .cloned()
                    .ok_or_else(|| unknown("time window", name))
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let configuration = ForecastCoverageConfiguration {
            indicator: self.require_indicator(&definition.indicator)?,
            spatial_region: self.require_spatial_region(&definition.spatial_region)?,
            year_period_group: self.require_year_period_group(&definition.year_period_group)?,
            model_group: self
                .model_groups
                .get(&definition.model_group)
                .cloned()
                .ok_or_else(|| unknown("model group", &definition.model_group))?,
            scenarios: definition.scenarios,
            time_windows,
            templates: definition.templates,
            sections: definition.sections,
        };

        let identifier = configuration.identifier();
        debug!(configuration = %identifier, "Registering forecast configuration");
        insert_unique(
            &mut self.forecast_configurations,
            "forecast configuration",
            identifier.clone(),
            Arc::new(configuration),
        )?;
        Ok(identifier)
    }

    /// Resolve and register a historical configuration. Returns its identifier.
    pub fn add_historical_configuration(
        &mut self,
        definition: HistoricalConfigurationDefinition,
    ) -> CatalogResult<String> {
        let configuration = HistoricalCoverageConfiguration {
            indicator: self.require_indicator(&definition.indicator)?,
            spatial_region: self.require_spatial_region(&definition.spatial_region)?,
            year_period_group: self.require_year_period_group(&definition.year_period_group)?,
            reference_period: definition.reference_period,
            decades: definition.decades,
            templates: definition.templates,
            sections: definition.sections,
        };

        let identifier = configuration.identifier();
        debug!(configuration = %identifier, "Registering historical configuration");
        insert_unique(
            &mut self.historical_configurations,
            "historical configuration",
            identifier.clone(),
            Arc::new(configuration),
        )?;
        Ok(identifier)
    }

    fn require_indicator(&self, identifier: &str) -> CatalogResult<ClimaticIndicator> {
        self.indicators
            .get(identifier)
            .cloned()
            .ok_or_else(|| unknown("indicator", identifier))
    }

    fn require_spatial_region(&self, name: &str) -> CatalogResult<SpatialRegion> {
        self.spatial_regions
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("spatial region", name))
    }

    fn require_year_period_group(&self, name: &str) -> CatalogResult<YearPeriodGroup> {
        self.year_period_groups
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("year period group", name))
    }
}

impl ConfigurationStore for InMemoryCatalog {
    fn indicator(&self, identifier: &str) -> Option<&ClimaticIndicator> {
        self.indicators.get(identifier)
    }

    fn spatial_region(&self, name: &str) -> Option<&SpatialRegion> {
        self.spatial_regions.get(name)
    }

    fn year_period_group(&self, name: &str) -> Option<&YearPeriodGroup> {
        self.year_period_groups.get(name)
    }

    fn model_group(&self, name: &str) -> Option<&ForecastModelGroup> {
        self.model_groups.get(name)
    }

    fn forecast_configuration(
        &self,
        identifier: &str,
    ) -> Option<Arc<ForecastCoverageConfiguration>> {
        self.forecast_configurations.get(identifier).cloned()
    }

    fn historical_configuration(
        &self,
        identifier: &str,
    ) -> Option<Arc<HistoricalCoverageConfiguration>> {
        self.historical_configurations.get(identifier).cloned()
    }

    fn configurations(&self) -> Vec<CoverageConfiguration> {
        self.forecast_configurations
            .values()
            .cloned()
            .map(CoverageConfiguration::Forecast)
            .chain(
                self.historical_configurations
                    .values()
                    .cloned()
                    .map(CoverageConfiguration::Historical),
            )
            .collect()
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    key: String,
    value: T,
) -> CatalogResult<()> {
    if map.contains_key(&key) {
        return Err(CatalogError::Duplicate { kind, name: key });
    }
    map.insert(key, value);
    Ok(())
}

fn unknown(kind: &'static str, name: &str) -> CatalogError {
    CatalogError::UnknownReference {
        kind,
        name: name.to_string(),
    }
}
