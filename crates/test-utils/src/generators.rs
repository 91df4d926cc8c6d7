//! Synthetic series generators.
//!
//! These generators create predictable, verifiable series that can be used
//! across the test suite and benchmarks.

use catalog_common::CoverageCategory;
use chrono::NaiveDate;
use series_processing::{DatasetType, SeriesLineage, SeriesPoint, TimeSeries};

/// Lineage of a series read from a coverage.
pub fn coverage_lineage(identifier: &str, category: CoverageCategory) -> SeriesLineage {
    SeriesLineage::Coverage {
        identifier: identifier.to_string(),
        category,
        crs: "EPSG:4326".to_string(),
    }
}

/// Lineage of an observation station series.
pub fn station_lineage(station_code: &str) -> SeriesLineage {
    SeriesLineage::Station {
        station_code: station_code.to_string(),
        indicator_identifier: "tdd-absolute-annual".to_string(),
        crs: "EPSG:4326".to_string(),
    }
}

/// One point per year on January 1st, starting at `start_year`.
///
/// # Example
///
/// ```
/// use test_utils::annual_points;
///
/// let points = annual_points(2000, &[1.0, 2.0]);
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[1].date.to_string(), "2001-01-01");
/// ```
pub fn annual_points(start_year: i32, values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| SeriesPoint::new(jan_first(start_year + i as i32), *value))
        .collect()
}

/// `years` annual points on the line `intercept + slope * i`.
pub fn linear_points(start_year: i32, years: usize, slope: f64, intercept: f64) -> Vec<SeriesPoint> {
    let values: Vec<f64> = (0..years).map(|i| intercept + slope * i as f64).collect();
    annual_points(start_year, &values)
}

/// Annual points on a line with a deterministic wiggle of amplitude `noise`.
///
/// The wiggle is a sum of two sines, so values are reproducible and the
/// underlying trend still dominates over long windows.
pub fn noisy_linear_points(
    start_year: i32,
    years: usize,
    slope: f64,
    intercept: f64,
    noise: f64,
) -> Vec<SeriesPoint> {
    let values: Vec<f64> = (0..years)
        .map(|i| {
            let t = i as f64;
            intercept + slope * t + noise * (0.7 * (1.3 * t).sin() + 0.3 * (3.1 * t).cos())
        })
        .collect();
    annual_points(start_year, &values)
}

/// One point per month for `years` years, value `f(year_index, month)`.
pub fn monthly_points(start_year: i32, years: usize, f: impl Fn(usize, u32) -> f64) -> Vec<SeriesPoint> {
    let mut points = Vec::with_capacity(years * 12);
    for year_index in 0..years {
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(start_year + year_index as i32, month, 1)
                .expect("first day of month is valid");
            points.push(SeriesPoint::new(date, f(year_index, month)));
        }
    }
    points
}

/// A raw observation series from station `ts0001`.
pub fn station_series(points: Vec<SeriesPoint>) -> TimeSeries {
    TimeSeries::new(station_lineage("ts0001"), DatasetType::Observation, points)
}

/// A raw main-dataset series from a forecast coverage.
pub fn forecast_series(points: Vec<SeriesPoint>) -> TimeSeries {
    TimeSeries::new(
        coverage_lineage(
            "forecast-tas-absolute-annual-arpa_vfvg-only_year-all_forecast_models-model_ensemble-rcp85-all_year",
            CoverageCategory::Forecast,
        ),
        DatasetType::Main,
        points,
    )
}

/// A raw main-dataset series from a historical coverage.
pub fn historical_series(points: Vec<SeriesPoint>) -> TimeSeries {
    TimeSeries::new(
        coverage_lineage(
            "historical-tdd-absolute-annual-arpa_v-winter_summer-winter",
            CoverageCategory::Historical,
        ),
        DatasetType::Main,
        points,
    )
}

fn jan_first(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st is valid")
}
