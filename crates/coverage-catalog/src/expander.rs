//! Coverage expansion.
//!
//! A configuration expands to the Cartesian product of its axes in a fixed
//! order: model, scenario, time window, year period for forecasts; year
//! period, decade for historical configurations. Optional axes with no values
//! are left out of the product. Required axes with no values produce an empty
//! expansion.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::coverage::{Coverage, ForecastCoverage, HistoricalCoverage};
use crate::model::{
    CoverageConfiguration, ForecastCoverageConfiguration, HistoricalCoverageConfiguration,
};
use crate::store::ConfigurationStore;

/// Expand any configuration into its concrete coverages.
pub fn generate_coverages(configuration: &CoverageConfiguration) -> Vec<Coverage> {
    match configuration {
        CoverageConfiguration::Forecast(c) => generate_forecast_coverages(c)
            .into_iter()
            .map(Coverage::from)
            .collect(),
        CoverageConfiguration::Historical(c) => generate_historical_coverages(c)
            .into_iter()
            .map(Coverage::from)
            .collect(),
    }
}

pub fn generate_forecast_coverages(
    configuration: &Arc<ForecastCoverageConfiguration>,
) -> Vec<ForecastCoverage> {
    let models = &configuration.model_group.models;
    let scenarios = &configuration.scenarios;
    let year_periods = &configuration.year_period_group.year_periods;

    if models.is_empty() || scenarios.is_empty() || year_periods.is_empty() {
        warn!(
            configuration = %configuration.identifier(),
            models = models.len(),
            scenarios = scenarios.len(),
            year_periods = year_periods.len(),
            "Forecast configuration has an empty required axis, no coverages generated"
        );
        return Vec::new();
    }

    // None stands in for the absent time-window axis
    let time_windows: Vec<_> = if configuration.time_windows.is_empty() {
        vec![None]
    } else {
        configuration.time_windows.iter().map(Some).collect()
    };

    let mut coverages =
        Vec::with_capacity(models.len() * scenarios.len() * time_windows.len() * year_periods.len());
    for model in models {
        for scenario in scenarios {
            for time_window in &time_windows {
                for year_period in year_periods {
                    coverages.push(ForecastCoverage {
                        configuration: Arc::clone(configuration),
                        model: model.clone(),
                        scenario: *scenario,
                        time_window: time_window.cloned(),
                        year_period: *year_period,
                    });
                }
            }
        }
    }

    debug!(
        configuration = %configuration.identifier(),
        count = coverages.len(),
        "Expanded forecast configuration"
    );
    coverages
}

pub fn generate_historical_coverages(
    configuration: &Arc<HistoricalCoverageConfiguration>,
) -> Vec<HistoricalCoverage> {
    let year_periods = &configuration.year_period_group.year_periods;
    if year_periods.is_empty() {
        warn!(
            configuration = %configuration.identifier(),
            "Historical configuration has no year periods, no coverages generated"
        );
        return Vec::new();
    }

    let decades: Vec<_> = if configuration.decades.is_empty() {
        vec![None]
    } else {
        configuration.decades.iter().copied().map(Some).collect()
    };

    year_periods
        .iter()
        .flat_map(|year_period| {
            decades.iter().map(move |decade| HistoricalCoverage {
                configuration: Arc::clone(configuration),
                year_period: *year_period,
                decade: *decade,
            })
        })
        .collect()
}

/// Coverages that differ from `coverage` only in the model.
///
/// Historical coverages have no model axis and therefore no siblings.
pub fn generate_siblings(coverage: &Coverage) -> Vec<Coverage> {
    match coverage {
        Coverage::Forecast(c) => generate_forecast_siblings(c)
            .into_iter()
            .map(Coverage::from)
            .collect(),
        Coverage::Historical(_) => Vec::new(),
    }
}

/// Other models of the coverage's model group, in group order.
pub fn generate_forecast_siblings(coverage: &ForecastCoverage) -> Vec<ForecastCoverage> {
    coverage
        .configuration
        .model_group
        .models
        .iter()
        .filter(|model| model.name != coverage.model.name)
        .map(|model| ForecastCoverage {
            model: model.clone(),
            ..coverage.clone()
        })
        .collect()
}

/// Expand every configuration in the store.
///
/// Configurations are expanded in parallel; the result keeps the store's
/// configuration order and each configuration's axis order.
pub fn expand_catalog<S>(store: &S) -> Vec<Coverage>
where
    S: ConfigurationStore + ?Sized,
{
    store
        .configurations()
        .par_iter()
        .flat_map_iter(generate_coverages)
        .collect()
}
