//! Tests for the derivation engine through its public entry point.

use chrono::NaiveDate;
use series_processing::{
    derive, derive_many, DerivationError, ProcessingMethod, TimeSeries, TrendDirection,
    TrendWindow,
};
use test_utils::{
    annual_points, assert_approx_eq, forecast_series, historical_series, linear_points,
    monthly_points, noisy_linear_points, station_series,
};

fn date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
}

// ============================================================================
// Lineage
// ============================================================================

#[test]
fn test_every_method_preserves_lineage() {
    let series = historical_series(noisy_linear_points(1961, 60, 0.02, 10.0, 0.5));
    let derived = derive_many(&series, ProcessingMethod::ALL, TrendWindow::default()).unwrap();
    assert_eq!(derived.len(), ProcessingMethod::ALL.len());

    for (method, result) in ProcessingMethod::ALL.iter().zip(&derived) {
        assert_eq!(result.lineage, series.lineage);
        assert_eq!(result.dataset_type, series.dataset_type);
        assert_eq!(result.processing_method, *method);
    }
}

#[test]
fn test_derived_identifier_is_deterministic() {
    let series = station_series(linear_points(1961, 60, 0.1, 5.0));
    let a = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1991, 2020)).unwrap();
    let b = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1991, 2020)).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.identifier(),
        "ts0001-tdd-absolute-annual**observation**mann_kendall_trend**years_1991_2020"
    );

    let c = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1961, 2020)).unwrap();
    assert_ne!(a.identifier(), c.identifier());
}

#[test]
fn test_no_processing_is_identity() {
    let series = station_series(annual_points(2000, &[1.0, f64::NAN, 3.0]));
    let derived = derive(&series, ProcessingMethod::NoProcessing, TrendWindow::default()).unwrap();
    assert_eq!(derived.points.len(), 3);
    assert!(derived.points[1].value.is_nan());
    assert_eq!(derived.identifier(), series.identifier());
}

#[test]
fn test_chained_derivation_names_every_step() {
    let values: Vec<f64> = (0..20i32).map(|i| f64::from(i * i)).collect();
    let raw = station_series(annual_points(1991, &values));
    let smoothed = derive(&raw, ProcessingMethod::MovingAverage, TrendWindow::default()).unwrap();

    let from_raw = derive(&raw, ProcessingMethod::DecadeAggregation, TrendWindow::default()).unwrap();
    let from_smoothed =
        derive(&smoothed, ProcessingMethod::DecadeAggregation, TrendWindow::default()).unwrap();

    // same method, different sources: values and identifiers both differ
    assert_ne!(from_raw.points, from_smoothed.points);
    assert_eq!(
        from_raw.identifier(),
        "ts0001-tdd-absolute-annual**observation**decade_aggregation"
    );
    assert_eq!(
        from_smoothed.identifier(),
        "ts0001-tdd-absolute-annual**observation**moving_average**window_5**decade_aggregation"
    );
    assert_eq!(from_smoothed.lineage, raw.lineage);

    // recomputing a chain gives the same identifier and values
    let again = derive(&smoothed, ProcessingMethod::DecadeAggregation, TrendWindow::default()).unwrap();
    assert_eq!(again, from_smoothed);
}

// ============================================================================
// Moving average
// ============================================================================

fn nan_count(series: &TimeSeries) -> usize {
    series.points.iter().filter(|p| p.value.is_nan()).count()
}

#[test]
fn test_moving_average_window_by_category() {
    let points = linear_points(1976, 30, 1.0, 0.0);

    let observed = derive(&station_series(points.clone()), ProcessingMethod::MovingAverage, TrendWindow::default()).unwrap();
    assert_eq!(observed.parameters.window, Some(5));
    assert_eq!(nan_count(&observed), 4);

    let historical = derive(&historical_series(points.clone()), ProcessingMethod::MovingAverage, TrendWindow::default()).unwrap();
    assert_eq!(historical.parameters.window, Some(5));

    let forecast = derive(&forecast_series(points), ProcessingMethod::MovingAverage, TrendWindow::default()).unwrap();
    assert_eq!(forecast.parameters.window, Some(11));
    assert_eq!(nan_count(&forecast), 10);
    // a centred mean of a line is the line itself
    assert_approx_eq!(forecast.points[5].value, 5.0, 1e-12);
    assert_eq!(forecast.points[5].date, date(1981));
}

// ============================================================================
// Decade aggregation
// ============================================================================

#[test]
fn test_decade_bucket_with_seven_points_kept_six_dropped() {
    // 1991..=1997: 7 points in the 1990 bucket; 2001..=2006: 6 points in the 2000 bucket
    let mut points = annual_points(1991, &[1.0; 7]);
    points.extend(annual_points(2001, &[2.0; 6]));

    let derived = derive(&station_series(points), ProcessingMethod::DecadeAggregation, TrendWindow::default()).unwrap();
    assert_eq!(derived.points.len(), 1);
    assert_eq!(derived.points[0].date, date(1990));
    assert_eq!(derived.points[0].value, 1.0);
}

#[test]
fn test_decade_aggregation_of_monthly_series() {
    let points = monthly_points(1991, 20, |year, _| year as f64);
    let derived = derive(&station_series(points), ProcessingMethod::DecadeAggregation, TrendWindow::default()).unwrap();
    assert_eq!(derived.points.len(), 2);
    assert_eq!(derived.points[0].date, date(1990));
    assert_approx_eq!(derived.points[0].value, 4.5, 1e-12);
    assert_approx_eq!(derived.points[1].value, 14.5, 1e-12);
}

// ============================================================================
// Mann-Kendall
// ============================================================================

#[test]
fn test_trend_span_of_27_years_succeeds() {
    let series = station_series(linear_points(1990, 40, 0.05, 3.0));
    let derived = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1991, 2018)).unwrap();
    let summary = derived.trend.unwrap();
    assert_eq!((summary.start_year, summary.end_year), (1991, 2018));
    assert_eq!(derived.points.len(), 28);
}

#[test]
fn test_trend_span_of_26_years_fails() {
    let series = station_series(linear_points(1990, 40, 0.05, 3.0));
    let err = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1991, 2017)).unwrap_err();
    assert_eq!(
        err,
        DerivationError::InsufficientTrendSpan {
            start_year: 1991,
            end_year: 2017,
            min_span: 27,
        }
    );
    assert_eq!(err.http_status_code(), 400);
}

#[test]
fn test_inferred_window_is_checked_too() {
    let series = station_series(linear_points(2000, 20, 0.05, 3.0));
    assert!(matches!(
        derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::default()),
        Err(DerivationError::InsufficientTrendSpan { start_year: 2000, end_year: 2019, .. })
    ));
}

#[test]
fn test_inverted_window_rejected() {
    let series = station_series(linear_points(1961, 60, 0.05, 3.0));
    assert!(matches!(
        derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(2020, 1991)),
        Err(DerivationError::InvalidWindow { .. })
    ));
}

#[test]
fn test_extreme_window_years_do_not_overflow() {
    let series = station_series(linear_points(1961, 60, 0.05, 3.0));

    let widest = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(i32::MIN, i32::MAX)).unwrap();
    assert_eq!(widest.points.len(), 60);
    assert_eq!(widest.parameters.years, Some((i32::MIN, i32::MAX)));

    assert!(matches!(
        derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(i32::MAX, i32::MIN)),
        Err(DerivationError::InvalidWindow { .. })
    ));
}

#[test]
fn test_trend_line_and_statistics() {
    let series = station_series(noisy_linear_points(1961, 60, 0.04, 11.0, 0.3));
    let derived = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1961, 2020)).unwrap();
    let summary = derived.trend.unwrap();

    assert_eq!(summary.trend, TrendDirection::Increasing);
    assert!(summary.significant);
    assert!(summary.p < 0.05);
    assert!(summary.tau > 0.0 && summary.tau <= 1.0);
    assert_approx_eq!(summary.slope, 0.04, 0.02);

    // the line is slope * (year - start) + intercept at every window date
    for point in &derived.points {
        let expected = summary.slope * (point.year() - 1961) as f64 + summary.intercept;
        assert_approx_eq!(point.value, expected, 1e-9);
    }
}

#[test]
fn test_trend_on_sparse_window_reports_missing_data() {
    let mut points = linear_points(1961, 60, 0.05, 3.0);
    for point in points.iter_mut().skip(2) {
        point.value = f64::NAN;
    }
    let series = station_series(points);
    assert!(matches!(
        derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1961, 2020)),
        Err(DerivationError::NotEnoughData { available: 2, .. })
    ));
}

// ============================================================================
// LOESS
// ============================================================================

#[test]
fn test_loess_keeps_dates_and_smooths() {
    let series = station_series(noisy_linear_points(1961, 60, 0.04, 11.0, 0.5));
    let derived = derive(&series, ProcessingMethod::LoessSmoothing, TrendWindow::default()).unwrap();
    assert_eq!(derived.points.len(), series.points.len());
    for (raw, smooth) in series.points.iter().zip(&derived.points) {
        assert_eq!(raw.date, smooth.date);
        assert!(smooth.value.is_finite());
    }

    let roughness = |values: Vec<f64>| -> f64 {
        values.windows(3).map(|w| (w[0] - 2.0 * w[1] + w[2]).abs()).sum()
    };
    let raw: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let smooth: Vec<f64> = derived.points.iter().map(|p| p.value).collect();
    assert!(roughness(smooth) < roughness(raw));
}

#[test]
fn test_loess_monthly_values_share_their_year() {
    let series = station_series(monthly_points(1991, 30, |year, month| year as f64 + month as f64 / 100.0));
    let derived = derive(&series, ProcessingMethod::LoessSmoothing, TrendWindow::default()).unwrap();
    let first_year: Vec<f64> = derived.points[..12].iter().map(|p| p.value).collect();
    assert!(first_year.iter().all(|v| (v - first_year[0]).abs() < 1e-9));
}

#[test]
fn test_loess_needs_three_points() {
    let series = station_series(annual_points(2000, &[1.0, 2.0]));
    assert!(matches!(
        derive(&series, ProcessingMethod::LoessSmoothing, TrendWindow::default()),
        Err(DerivationError::NotEnoughData { required: 3, available: 2, .. })
    ));
}
