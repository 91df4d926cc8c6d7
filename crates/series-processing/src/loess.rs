//! LOESS smoothing.
//!
//! Local quadratic regression with tricube weights over the `span` fraction
//! of nearest points. The regressor is the calendar year, so points sharing
//! a year share a neighbourhood. Each local fit is solved through an SVD,
//! which copes with neighbourhoods that have fewer distinct years than
//! coefficients.

use nalgebra::{Matrix3, Vector3};

use crate::series::SeriesPoint;

/// Fraction of points used in each local fit.
pub const DEFAULT_SPAN: f64 = 0.75;

/// Degree of the local polynomial.
pub const DEGREE: usize = 2;

/// Fewest valid points a LOESS fit accepts.
pub const MIN_POINTS: usize = DEGREE + 1;

const SVD_EPSILON: f64 = 1e-12;

/// Smooth `points`, returning one fitted value per input date.
///
/// Missing input values stay missing. Returns `None` when fewer than
/// [`MIN_POINTS`] valid points are available.
pub fn loess(points: &[SeriesPoint], span: f64) -> Option<Vec<SeriesPoint>> {
    let samples: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.is_valid())
        .map(|p| (p.year() as f64, p.value))
        .collect();
    if samples.len() < MIN_POINTS {
        return None;
    }

    let neighbours = ((span * samples.len() as f64).floor() as usize).clamp(MIN_POINTS, samples.len());

    let smoothed = points
        .iter()
        .map(|point| {
            let value = if point.is_valid() {
                fit_at(&samples, point.year() as f64, neighbours, span)
            } else {
                f64::NAN
            };
            SeriesPoint::new(point.date, value)
        })
        .collect();
    Some(smoothed)
}

/// Weighted quadratic fit evaluated at `x0`.
fn fit_at(samples: &[(f64, f64)], x0: f64, neighbours: usize, span: f64) -> f64 {
    let mut distances: Vec<f64> = samples.iter().map(|(x, _)| (x - x0).abs()).collect();
    distances.sort_by(|a, b| a.total_cmp(b));
    let mut radius = distances[neighbours - 1];
    if span > 1.0 {
        radius *= span;
    }

    // Normal equations of the weighted least squares problem, in units of
    // the radius around x0 so the intercept is the fitted value
    let scale = if radius > 0.0 { radius } else { 1.0 };
    let mut xtwx = Matrix3::<f64>::zeros();
    let mut xtwy = Vector3::<f64>::zeros();
    for (x, y) in samples {
        let weight = tricube(x - x0, radius);
        if weight <= 0.0 {
            continue;
        }
        let u = (x - x0) / scale;
        let row = Vector3::new(1.0, u, u * u);
        xtwx += weight * row * row.transpose();
        xtwy += weight * *y * row;
    }

    match xtwx.svd(true, true).solve(&xtwy, SVD_EPSILON) {
        Ok(beta) => beta[0],
        Err(_) => weighted_mean(samples, x0, radius),
    }
}

fn tricube(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }
    let u = (distance / radius).abs();
    if u >= 1.0 {
        0.0
    } else {
        (1.0 - u.powi(3)).powi(3)
    }
}

fn weighted_mean(samples: &[(f64, f64)], x0: f64, radius: f64) -> f64 {
    let (sum, weights) = samples.iter().fold((0.0, 0.0), |(sum, weights), (x, y)| {
        let w = tricube(x - x0, radius);
        (sum + w * y, weights + w)
    });
    if weights > 0.0 {
        sum / weights
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn annual(start: i32, values: impl IntoIterator<Item = f64>) -> Vec<SeriesPoint> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                SeriesPoint::new(NaiveDate::from_ymd_opt(start + i as i32, 1, 1).unwrap(), v)
            })
            .collect()
    }

    #[test]
    fn test_quadratic_is_reproduced() {
        let points = annual(1990, (0..30).map(|i| 0.5 * (i as f64).powi(2) - 3.0 * i as f64 + 2.0));
        let smoothed = loess(&points, DEFAULT_SPAN).unwrap();
        for (raw, fit) in points.iter().zip(&smoothed) {
            assert_eq!(raw.date, fit.date);
            assert!((raw.value - fit.value).abs() < 1e-6, "{} vs {}", raw.value, fit.value);
        }
    }

    #[test]
    fn test_too_few_points() {
        assert!(loess(&annual(2000, [1.0, 2.0]), DEFAULT_SPAN).is_none());
    }

    #[test]
    fn test_missing_values_stay_missing() {
        let mut points = annual(1990, (0..20).map(|i| i as f64));
        points[5].value = f64::NAN;
        let smoothed = loess(&points, DEFAULT_SPAN).unwrap();
        assert!(smoothed[5].value.is_nan());
        assert!((smoothed[6].value - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_tricube() {
        assert_eq!(tricube(0.0, 2.0), 1.0);
        assert_eq!(tricube(2.0, 2.0), 0.0);
        assert!(tricube(1.0, 2.0) > 0.0);
    }
}
