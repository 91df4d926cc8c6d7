//! Derivation engine: one source series, one processing method.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decade::decade_aggregation;
use crate::error::{DerivationError, DerivationResult};
use crate::loess::{self, loess, DEFAULT_SPAN};
use crate::mann_kendall::{self, mann_kendall, MIN_TREND_SPAN_YEARS};
use crate::moving_average::{moving_average, DEFAULT_WINDOW, FORECAST_WINDOW};
use crate::series::{ProcessingMethod, ProcessingParameters, TimeSeries};

/// Year window for the trend method. Missing ends are inferred from the
/// first and last valid points of the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendWindow {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl TrendWindow {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year: Some(start_year),
            end_year: Some(end_year),
        }
    }
}

/// Derive a new series from `series` with `method`.
///
/// Lineage and dataset type are copied unchanged. Deriving from an already
/// derived series is allowed; the source's processing steps are kept in
/// `history` so the identifier still names the whole chain.
pub fn derive(
    series: &TimeSeries,
    method: ProcessingMethod,
    window: TrendWindow,
) -> DerivationResult<TimeSeries> {
    if series.processing_method != ProcessingMethod::NoProcessing {
        debug!(
            series = %series.identifier(),
            method = %method,
            "Deriving from an already derived series"
        );
    }

    let derived = match method {
        ProcessingMethod::NoProcessing => {
            series.derived(method, ProcessingParameters::default(), series.points.clone())
        }
        ProcessingMethod::LoessSmoothing => {
            let points = loess(&series.points, DEFAULT_SPAN).ok_or_else(|| {
                not_enough_data(series, method, loess::MIN_POINTS)
            })?;
            series.derived(method, ProcessingParameters::default(), points)
        }
        ProcessingMethod::MovingAverage => {
            let window = moving_average_window(series);
            let parameters = ProcessingParameters {
                window: Some(window),
                years: None,
            };
            series.derived(method, parameters, moving_average(&series.points, window))
        }
        ProcessingMethod::DecadeAggregation => series.derived(
            method,
            ProcessingParameters::default(),
            decade_aggregation(&series.points),
        ),
        ProcessingMethod::MannKendallTrend => {
            let (start_year, end_year) = resolve_trend_window(series, window)?;
            let fit = mann_kendall(&series.points, start_year, end_year).ok_or_else(|| {
                not_enough_data(series, method, mann_kendall::MIN_POINTS)
            })?;
            let parameters = ProcessingParameters {
                window: None,
                years: Some((start_year, end_year)),
            };
            let mut derived = series.derived(method, parameters, fit.line);
            derived.trend = Some(fit.summary);
            derived
        }
    };

    debug!(
        source = %series.identifier(),
        derived = %derived.identifier(),
        points = derived.points.len(),
        "Derived series"
    );
    Ok(derived)
}

/// Derive several series from the same source, stopping at the first error.
pub fn derive_many(
    series: &TimeSeries,
    methods: &[ProcessingMethod],
    window: TrendWindow,
) -> DerivationResult<Vec<TimeSeries>> {
    methods
        .iter()
        .map(|method| derive(series, *method, window))
        .collect()
}

/// Moving-average window in points for this series.
pub fn moving_average_window(series: &TimeSeries) -> usize {
    if series.lineage.is_forecast() {
        FORECAST_WINDOW
    } else {
        DEFAULT_WINDOW
    }
}

/// Fill missing window ends from the data and enforce the minimum span.
pub fn resolve_trend_window(
    series: &TimeSeries,
    window: TrendWindow,
) -> DerivationResult<(i32, i32)> {
    let span = series.year_span();
    let missing =
        || not_enough_data(series, ProcessingMethod::MannKendallTrend, mann_kendall::MIN_POINTS);
    let start_year = window
        .start_year
        .or(span.map(|(start, _)| start))
        .ok_or_else(missing)?;
    let end_year = window
        .end_year
        .or(span.map(|(_, end)| end))
        .ok_or_else(missing)?;

    if start_year > end_year {
        return Err(DerivationError::InvalidWindow {
            start_year,
            end_year,
        });
    }
    if i64::from(end_year) - i64::from(start_year) < i64::from(MIN_TREND_SPAN_YEARS) {
        debug!(start_year, end_year, "Trend window too short");
        return Err(DerivationError::InsufficientTrendSpan {
            start_year,
            end_year,
            min_span: MIN_TREND_SPAN_YEARS,
        });
    }
    Ok((start_year, end_year))
}

fn not_enough_data(series: &TimeSeries, method: ProcessingMethod, required: usize) -> DerivationError {
    DerivationError::NotEnoughData {
        method,
        required,
        available: series.valid_points().count(),
    }
}
