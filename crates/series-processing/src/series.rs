//! Time-series model.
//!
//! A series is a date-indexed list of values tied to a coverage or to an
//! observation station. Derivation keeps the lineage untouched and only
//! changes the dataset type, the processing method and the data.

use std::fmt;
use std::str::FromStr;

use catalog_common::CoverageCategory;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DerivationError;

/// Separator between the parts of a derived series identifier.
pub const SERIES_IDENTIFIER_SEPARATOR: &str = "**";

/// Which dataset of a coverage (or station) a series was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    Main,
    LowerUncertainty,
    UpperUncertainty,
    Observation,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Main => "main",
            DatasetType::LowerUncertainty => "lower_uncertainty",
            DatasetType::UpperUncertainty => "upper_uncertainty",
            DatasetType::Observation => "observation",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing methods supported by the derivation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    NoProcessing,
    LoessSmoothing,
    MovingAverage,
    DecadeAggregation,
    MannKendallTrend,
}

impl ProcessingMethod {
    pub const ALL: &'static [ProcessingMethod] = &[
        ProcessingMethod::NoProcessing,
        ProcessingMethod::LoessSmoothing,
        ProcessingMethod::MovingAverage,
        ProcessingMethod::DecadeAggregation,
        ProcessingMethod::MannKendallTrend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMethod::NoProcessing => "no_processing",
            ProcessingMethod::LoessSmoothing => "loess_smoothing",
            ProcessingMethod::MovingAverage => "moving_average",
            ProcessingMethod::DecadeAggregation => "decade_aggregation",
            ProcessingMethod::MannKendallTrend => "mann_kendall_trend",
        }
    }
}

impl fmt::Display for ProcessingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMethod {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessingMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DerivationError::UnknownMethod(s.to_string()))
    }
}

/// What a series is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesLineage {
    Coverage {
        identifier: String,
        category: CoverageCategory,
        crs: String,
    },
    Station {
        station_code: String,
        indicator_identifier: String,
        crs: String,
    },
}

impl SeriesLineage {
    pub fn identifier(&self) -> String {
        match self {
            SeriesLineage::Coverage { identifier, .. } => identifier.clone(),
            SeriesLineage::Station {
                station_code,
                indicator_identifier,
                ..
            } => format!("{}-{}", station_code, indicator_identifier),
        }
    }

    pub fn crs(&self) -> &str {
        match self {
            SeriesLineage::Coverage { crs, .. } | SeriesLineage::Station { crs, .. } => crs,
        }
    }

    /// True for series read from a forecast coverage.
    pub fn is_forecast(&self) -> bool {
        matches!(
            self,
            SeriesLineage::Coverage {
                category: CoverageCategory::Forecast,
                ..
            }
        )
    }
}

/// A single dated value. `NaN` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// Serialized as `null` when missing
    #[serde(deserialize_with = "nullable_value")]
    pub value: f64,
}

fn nullable_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn is_valid(&self) -> bool {
        !self.value.is_nan()
    }
}

/// Parameters a derivation was computed with. Part of the derived identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingParameters {
    /// Moving average window, in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
    /// Inclusive trend window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<(i32, i32)>,
}

impl ProcessingParameters {
    /// Identifier fragment, `None` when no parameter applies.
    pub fn fragment(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(window) = self.window {
            parts.push(format!("window_{}", window));
        }
        if let Some((start, end)) = self.years {
            parts.push(format!("years_{}_{}", start, end));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(SERIES_IDENTIFIER_SEPARATOR))
        }
    }
}

/// One derivation applied to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub method: ProcessingMethod,
    #[serde(default)]
    pub parameters: ProcessingParameters,
}

impl ProcessingStep {
    /// `{method}[**{parameters}]`
    pub fn fragment(&self) -> String {
        match self.parameters.fragment() {
            Some(parameters) => {
                format!("{}{}{}", self.method, SERIES_IDENTIFIER_SEPARATOR, parameters)
            }
            None => self.method.as_str().to_string(),
        }
    }
}

/// Direction reported by the Mann-Kendall test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoTrend,
}

/// Side-channel statistics of a Mann-Kendall trend derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub trend: TrendDirection,
    pub significant: bool,
    pub z: f64,
    pub tau: f64,
    pub s: f64,
    pub var_s: f64,
    pub p: f64,
    /// Sen's slope, per year
    pub slope: f64,
    pub intercept: f64,
    pub start_year: i32,
    pub end_year: i32,
}

/// A raw or derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub lineage: SeriesLineage,
    pub dataset_type: DatasetType,
    #[serde(default = "default_method")]
    pub processing_method: ProcessingMethod,
    #[serde(default)]
    pub parameters: ProcessingParameters,
    /// Steps that produced the source of this series, oldest first. Empty
    /// when the source was raw.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ProcessingStep>,
    pub points: Vec<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSummary>,
}

fn default_method() -> ProcessingMethod {
    ProcessingMethod::NoProcessing
}

impl TimeSeries {
    /// A raw series.
    pub fn new(lineage: SeriesLineage, dataset_type: DatasetType, points: Vec<SeriesPoint>) -> Self {
        Self {
            lineage,
            dataset_type,
            processing_method: ProcessingMethod::NoProcessing,
            parameters: ProcessingParameters::default(),
            history: Vec::new(),
            points,
            trend: None,
        }
    }

    /// `{lineage}**{dataset_type}[**{earlier steps}]**{method}[**{parameters}]`
    pub fn identifier(&self) -> String {
        let mut parts = vec![
            self.lineage.identifier(),
            self.dataset_type.as_str().to_string(),
        ];
        parts.extend(self.history.iter().map(ProcessingStep::fragment));
        parts.push(self.step().fragment());
        parts.join(SERIES_IDENTIFIER_SEPARATOR)
    }

    /// The derivation that produced this series.
    pub fn step(&self) -> ProcessingStep {
        ProcessingStep {
            method: self.processing_method,
            parameters: self.parameters.clone(),
        }
    }

    /// Points with a value, in order.
    pub fn valid_points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter().filter(|p| p.is_valid())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last year with a valid value.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut years = self.valid_points().map(SeriesPoint::year);
        let first = years.next()?;
        let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some((min, max))
    }

    /// Copy of this series' metadata carrying new data. A derived source
    /// moves its own step into the history.
    pub(crate) fn derived(
        &self,
        processing_method: ProcessingMethod,
        parameters: ProcessingParameters,
        points: Vec<SeriesPoint>,
    ) -> Self {
        let mut history = self.history.clone();
        if self.processing_method != ProcessingMethod::NoProcessing {
            history.push(self.step());
        }
        Self {
            lineage: self.lineage.clone(),
            dataset_type: self.dataset_type,
            processing_method,
            parameters,
            history,
            points,
            trend: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> TimeSeries {
        TimeSeries::new(
            SeriesLineage::Station {
                station_code: "ts0001".to_string(),
                indicator_identifier: "tdd-absolute-annual".to_string(),
                crs: "EPSG:4326".to_string(),
            },
            DatasetType::Observation,
            vec![
                SeriesPoint::new(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 1.0),
                SeriesPoint::new(NaiveDate::from_ymd_opt(2002, 1, 1).unwrap(), f64::NAN),
                SeriesPoint::new(NaiveDate::from_ymd_opt(2003, 1, 1).unwrap(), 3.0),
            ],
        )
    }

    #[test]
    fn test_raw_identifier() {
        assert_eq!(
            series().identifier(),
            "ts0001-tdd-absolute-annual**observation**no_processing"
        );
    }

    #[test]
    fn test_derived_identifier_with_parameters() {
        let base = series();
        let derived = base.derived(
            ProcessingMethod::MannKendallTrend,
            ProcessingParameters {
                window: None,
                years: Some((1991, 2020)),
            },
            vec![],
        );
        assert_eq!(
            derived.identifier(),
            "ts0001-tdd-absolute-annual**observation**mann_kendall_trend**years_1991_2020"
        );
        assert_eq!(derived.lineage, base.lineage);
    }

    #[test]
    fn test_derived_source_step_moves_into_history() {
        let smoothed = series().derived(
            ProcessingMethod::MovingAverage,
            ProcessingParameters {
                window: Some(5),
                years: None,
            },
            vec![],
        );
        assert!(smoothed.history.is_empty());

        let decades =
            smoothed.derived(ProcessingMethod::DecadeAggregation, ProcessingParameters::default(), vec![]);
        assert_eq!(decades.history, vec![smoothed.step()]);
        assert_eq!(
            decades.identifier(),
            "ts0001-tdd-absolute-annual**observation**moving_average**window_5**decade_aggregation"
        );

        let json = serde_json::to_string(&decades).unwrap();
        let parsed: TimeSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.identifier(), decades.identifier());
        assert!(!serde_json::to_string(&series()).unwrap().contains("history"));
    }

    #[test]
    fn test_valid_points_skip_nan() {
        let s = series();
        assert_eq!(s.valid_points().count(), 2);
        assert_eq!(s.year_span(), Some((2001, 2003)));
    }

    #[test]
    fn test_missing_values_round_trip_as_null() {
        let json = serde_json::to_string(&series().points).unwrap();
        assert!(json.contains("null"));
        let points: Vec<SeriesPoint> = serde_json::from_str(&json).unwrap();
        assert!(points[1].value.is_nan());
        assert_eq!(points[2].value, 3.0);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(
            "decade_aggregation".parse::<ProcessingMethod>(),
            Ok(ProcessingMethod::DecadeAggregation)
        );
        assert!(matches!(
            "kalman".parse::<ProcessingMethod>(),
            Err(DerivationError::UnknownMethod(_))
        ));
    }
}
