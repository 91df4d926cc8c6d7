//! Coverage identifier decoding.
//!
//! Identifiers are `-`-separated segment lists:
//!
//! ```text
//! forecast-{indicator}-{measure}-{agg}-{region}-{yearPeriodGroup}-{modelGroup}-{model}-{scenario}[-{timeWindow}]-{yearPeriod}
//! historical-{indicator}-{measure}-{agg}-{region}-{yearPeriodGroup}[-{referencePeriod}]-{yearPeriod}[-{decade}]
//! ```
//!
//! Encoding lives on the coverage types (`identifier()`). Decoding never
//! fails loudly: any segment that does not resolve yields `None`, and callers
//! treat `None` as "not found".

use std::sync::Arc;

use catalog_common::{CoverageCategory, Decade, ReferencePeriod, Scenario, YearPeriod};
use tracing::debug;

use crate::coverage::{Coverage, ForecastCoverage, HistoricalCoverage};
use crate::model::{ForecastCoverageConfiguration, HistoricalCoverageConfiguration};
use crate::store::ConfigurationStore;

/// Segments in a forecast configuration identifier.
const FORECAST_CONFIGURATION_SEGMENTS: usize = 7;

/// Candidate historical configuration lengths, tried in order.
///
/// The optional reference period makes the configuration boundary
/// ambiguous, so the longer grammar is tried first and the first candidate
/// whose configuration resolves wins.
const HISTORICAL_CONFIGURATION_SEGMENTS: [usize; 2] = [7, 6];

/// Decode any coverage identifier.
pub fn get_coverage<S>(store: &S, identifier: &str) -> Option<Coverage>
where
    S: ConfigurationStore + ?Sized,
{
    let category = identifier.split('-').next()?.parse::<CoverageCategory>().ok();
    match category {
        Some(CoverageCategory::Forecast) => get_forecast_coverage(store, identifier).map(Coverage::from),
        Some(CoverageCategory::Historical) => {
            get_historical_coverage(store, identifier).map(Coverage::from)
        }
        None => {
            debug!(identifier, "unknown coverage category");
            None
        }
    }
}

/// Decode a forecast configuration identifier.
pub fn get_forecast_coverage_configuration_by_identifier<S>(
    store: &S,
    identifier: &str,
) -> Option<Arc<ForecastCoverageConfiguration>>
where
    S: ConfigurationStore + ?Sized,
{
    let segments: Vec<&str> = identifier.split('-').collect();
    if segments.len() != FORECAST_CONFIGURATION_SEGMENTS {
        return None;
    }
    resolve_forecast_configuration(store, &segments)
}

/// Decode a historical configuration identifier (with or without reference period).
pub fn get_historical_coverage_configuration_by_identifier<S>(
    store: &S,
    identifier: &str,
) -> Option<Arc<HistoricalCoverageConfiguration>>
where
    S: ConfigurationStore + ?Sized,
{
    let segments: Vec<&str> = identifier.split('-').collect();
    if !HISTORICAL_CONFIGURATION_SEGMENTS.contains(&segments.len()) {
        return None;
    }
    resolve_historical_configuration(store, &segments)
}

/// Decode a forecast coverage identifier.
pub fn get_forecast_coverage<S>(store: &S, identifier: &str) -> Option<ForecastCoverage>
where
    S: ConfigurationStore + ?Sized,
{
    let segments: Vec<&str> = identifier.split('-').collect();
    if segments.len() <= FORECAST_CONFIGURATION_SEGMENTS {
        debug!(identifier, "forecast identifier too short");
        return None;
    }
    let (prefix, rest) = segments.split_at(FORECAST_CONFIGURATION_SEGMENTS);
    let configuration = resolve_forecast_configuration(store, prefix)?;

    let (model, scenario, time_window, year_period) = match (rest, configuration.time_windows.is_empty()) {
        ([model, scenario, year_period], true) => (*model, *scenario, None, *year_period),
        ([model, scenario, time_window, year_period], false) => {
            (*model, *scenario, Some(*time_window), *year_period)
        }
        _ => {
            debug!(identifier, "forecast identifier has wrong number of axis segments");
            return None;
        }
    };

    let model = configuration.model_group.model(model).cloned();
    let scenario = scenario
        .parse::<Scenario>()
        .ok()
        .filter(|s| configuration.scenarios.contains(s));
    let time_window = match time_window {
        Some(name) => Some(configuration.time_window(name).cloned()?),
        None => None,
    };
    let year_period = year_period
        .parse::<YearPeriod>()
        .ok()
        .filter(|yp| configuration.year_period_group.contains(*yp));

    match (model, scenario, year_period) {
        (Some(model), Some(scenario), Some(year_period)) => Some(ForecastCoverage {
            configuration,
            model,
            scenario,
            time_window,
            year_period,
        }),
        _ => {
            debug!(identifier, "forecast identifier axis value not part of configuration");
            None
        }
    }
}

/// Decode a historical coverage identifier.
pub fn get_historical_coverage<S>(store: &S, identifier: &str) -> Option<HistoricalCoverage>
where
    S: ConfigurationStore + ?Sized,
{
    let segments: Vec<&str> = identifier.split('-').collect();
    let (configuration, rest) = HISTORICAL_CONFIGURATION_SEGMENTS
        .iter()
        .filter(|n| segments.len() > **n)
        .find_map(|n| {
            let (prefix, rest) = segments.split_at(*n);
            resolve_historical_configuration(store, prefix).map(|c| (c, rest))
        })?;

    let (year_period, decade) = match (rest, configuration.decades.is_empty()) {
        ([year_period], true) => (*year_period, None),
        ([year_period, decade], false) => (*year_period, Some(*decade)),
        _ => {
            debug!(identifier, "historical identifier has wrong number of axis segments");
            return None;
        }
    };

    let year_period = year_period
        .parse::<YearPeriod>()
        .ok()
        .filter(|yp| configuration.year_period_group.contains(*yp))?;
    let decade = match decade {
        Some(d) => Some(
            d.parse::<Decade>()
                .ok()
                .filter(|d| configuration.decades.contains(d))?,
        ),
        None => None,
    };

    Some(HistoricalCoverage {
        configuration,
        year_period,
        decade,
    })
}

fn resolve_forecast_configuration<S>(
    store: &S,
    segments: &[&str],
) -> Option<Arc<ForecastCoverageConfiguration>>
where
    S: ConfigurationStore + ?Sized,
{
    let [category, name, measure, aggregation, region, year_period_group, model_group] = segments
    else {
        return None;
    };
    if *category != CoverageCategory::Forecast.as_str() {
        return None;
    }

    let indicator_id = [*name, *measure, *aggregation].join("-");
    store.indicator(&indicator_id).or_else(|| miss("indicator", &indicator_id))?;
    store.spatial_region(region).or_else(|| miss("spatial region", region))?;
    store
        .year_period_group(year_period_group)
        .or_else(|| miss("year period group", year_period_group))?;
    store
        .model_group(model_group)
        .or_else(|| miss("model group", model_group))?;

    let identifier = segments.join("-");
    store
        .forecast_configuration(&identifier)
        .filter(|c| segment_count(&c.identifier()) == segments.len())
        .or_else(|| miss("forecast configuration", &identifier))
}

fn resolve_historical_configuration<S>(
    store: &S,
    segments: &[&str],
) -> Option<Arc<HistoricalCoverageConfiguration>>
where
    S: ConfigurationStore + ?Sized,
{
    let (base, reference_period) = match segments {
        [base @ .., reference_period] if segments.len() == 7 => (base, Some(*reference_period)),
        base if segments.len() == 6 => (base, None),
        _ => return None,
    };
    let [category, name, measure, aggregation, region, year_period_group] = base else {
        return None;
    };
    if *category != CoverageCategory::Historical.as_str() {
        return None;
    }

    let indicator_id = [*name, *measure, *aggregation].join("-");
    store.indicator(&indicator_id).or_else(|| miss("indicator", &indicator_id))?;
    store.spatial_region(region).or_else(|| miss("spatial region", region))?;
    store
        .year_period_group(year_period_group)
        .or_else(|| miss("year period group", year_period_group))?;
    if let Some(reference_period) = reference_period {
        reference_period.parse::<ReferencePeriod>().ok()?;
    }

    let identifier = segments.join("-");
    store
        .historical_configuration(&identifier)
        .filter(|c| segment_count(&c.identifier()) == segments.len())
        .or_else(|| miss("historical configuration", &identifier))
}

fn segment_count(identifier: &str) -> usize {
    identifier.split('-').count()
}

fn miss<T>(kind: &str, name: &str) -> Option<T> {
    debug!(kind, name, "identifier lookup missed");
    None
}
