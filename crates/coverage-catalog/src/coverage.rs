//! Concrete coverages: one point in a configuration's axis product.
//!
//! Coverages are ephemeral values built on demand from a configuration and a
//! chosen axis tuple. Their identifier is the encoded form of that tuple.

use std::fmt;
use std::sync::Arc;

use catalog_common::{CoverageCategory, Decade, Scenario, YearPeriod};
use serde::Serialize;

use crate::model::{
    DatasetTemplates, ForecastCoverageConfiguration, ForecastModel, ForecastTimeWindow,
    HistoricalCoverageConfiguration,
};

/// A forecast coverage: configuration plus model, scenario, optional time
/// window and year period.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCoverage {
    pub configuration: Arc<ForecastCoverageConfiguration>,
    pub model: ForecastModel,
    pub scenario: Scenario,
    pub time_window: Option<ForecastTimeWindow>,
    pub year_period: YearPeriod,
}

impl ForecastCoverage {
    /// `{configuration}-{model}-{scenario}[-{timeWindow}]-{yearPeriod}`
    pub fn identifier(&self) -> String {
        let mut parts = vec![
            self.configuration.identifier(),
            self.model.name.clone(),
            self.scenario.as_str().to_string(),
        ];
        if let Some(time_window) = &self.time_window {
            parts.push(time_window.name.clone());
        }
        parts.push(self.year_period.as_str().to_string());
        parts.join("-")
    }
}

/// A historical coverage: configuration plus year period and optional decade.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalCoverage {
    pub configuration: Arc<HistoricalCoverageConfiguration>,
    pub year_period: YearPeriod,
    pub decade: Option<Decade>,
}

impl HistoricalCoverage {
    /// `{configuration}-{yearPeriod}[-{decade}]`
    pub fn identifier(&self) -> String {
        let configuration = self.configuration.identifier();
        match self.decade {
            Some(decade) => format!("{}-{}-{}", configuration, self.year_period, decade),
            None => format!("{}-{}", configuration, self.year_period),
        }
    }
}

/// Either kind of coverage.
#[derive(Debug, Clone, PartialEq)]
pub enum Coverage {
    Forecast(ForecastCoverage),
    Historical(HistoricalCoverage),
}

impl Coverage {
    /// Encoded coverage identifier.
    pub fn identifier(&self) -> String {
        match self {
            Coverage::Forecast(c) => c.identifier(),
            Coverage::Historical(c) => c.identifier(),
        }
    }

    /// Identifier of the configuration this coverage was expanded from.
    pub fn configuration_identifier(&self) -> String {
        match self {
            Coverage::Forecast(c) => c.configuration.identifier(),
            Coverage::Historical(c) => c.configuration.identifier(),
        }
    }

    pub fn category(&self) -> CoverageCategory {
        match self {
            Coverage::Forecast(_) => CoverageCategory::Forecast,
            Coverage::Historical(_) => CoverageCategory::Historical,
        }
    }

    pub fn year_period(&self) -> YearPeriod {
        match self {
            Coverage::Forecast(c) => c.year_period,
            Coverage::Historical(c) => c.year_period,
        }
    }

    pub(crate) fn templates(&self) -> &DatasetTemplates {
        match self {
            Coverage::Forecast(c) => &c.configuration.templates,
            Coverage::Historical(c) => &c.configuration.templates,
        }
    }
}

impl From<ForecastCoverage> for Coverage {
    fn from(coverage: ForecastCoverage) -> Self {
        Coverage::Forecast(coverage)
    }
}

impl From<HistoricalCoverage> for Coverage {
    fn from(coverage: HistoricalCoverage) -> Self {
        Coverage::Historical(coverage)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// Where the bytes of one dataset live: remote URL plus in-file variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetLocator {
    pub url: String,
    pub variable: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ClimaticIndicator, DatasetTemplates, ForecastModelGroup, SectionFlags, SpatialRegion,
        YearPeriodGroup,
    };
    use catalog_common::{AggregationPeriod, MeasureType};

    fn forecast_configuration() -> Arc<ForecastCoverageConfiguration> {
        Arc::new(ForecastCoverageConfiguration {
            indicator: ClimaticIndicator::new("tas", MeasureType::Absolute, AggregationPeriod::Annual),
            spatial_region: SpatialRegion::new("arpa_vfvg"),
            year_period_group: YearPeriodGroup::new("only_year", vec![YearPeriod::AllYear]),
            model_group: ForecastModelGroup::new(
                "all_models",
                vec![ForecastModel::new("model_ensemble", "ensemble")],
            ),
            scenarios: vec![Scenario::Rcp45],
            time_windows: vec![],
            templates: DatasetTemplates::new("tas", "tas_{scenario}.nc"),
            sections: SectionFlags::default(),
        })
    }

    #[test]
    fn test_forecast_identifier_without_time_window() {
        let coverage = ForecastCoverage {
            configuration: forecast_configuration(),
            model: ForecastModel::new("model_ensemble", "ensemble"),
            scenario: Scenario::Rcp45,
            time_window: None,
            year_period: YearPeriod::AllYear,
        };
        assert_eq!(
            coverage.identifier(),
            "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_models-model_ensemble-rcp45-all_year"
        );
    }

    #[test]
    fn test_forecast_identifier_with_time_window() {
        let coverage = ForecastCoverage {
            configuration: forecast_configuration(),
            model: ForecastModel::new("model_ensemble", "ensemble"),
            scenario: Scenario::Rcp85,
            time_window: Some(ForecastTimeWindow::new("tw1")),
            year_period: YearPeriod::Winter,
        };
        assert_eq!(
            coverage.identifier(),
            "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_models-model_ensemble-rcp85-tw1-winter"
        );
    }
}
