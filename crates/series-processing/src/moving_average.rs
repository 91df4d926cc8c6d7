//! Centered moving average.

use crate::series::SeriesPoint;

/// Window for observation and historical series, in years.
pub const DEFAULT_WINDOW: usize = 5;

/// Window for forecast series, in years.
pub const FORECAST_WINDOW: usize = 11;

/// Centered rolling mean over `window` calendar years.
///
/// A point in year `y` averages every point dated in
/// `y - window / 2 ..= y + window / 2`. Points whose window reaches past the
/// first or last year of the series have no full window and get `NaN`, as do
/// points whose window misses a year or holds a `NaN`. Output has the same
/// dates as the input, which must be in date order.
pub fn moving_average(points: &[SeriesPoint], window: usize) -> Vec<SeriesPoint> {
    let half = (window / 2) as i32;
    let span = points.first().zip(points.last()).map(|(f, l)| (f.year(), l.year()));

    points
        .iter()
        .map(|point| {
            let value = match span {
                Some((first, last)) if window > 0 => {
                    let (from, to) = (point.year() - half, point.year() + half);
                    if from < first || to > last {
                        f64::NAN
                    } else {
                        window_mean(points, from, to, window)
                    }
                }
                _ => f64::NAN,
            };
            SeriesPoint::new(point.date, value)
        })
        .collect()
}

/// Mean of the points dated in `from..=to`, `NaN` unless every one of the
/// `years` years is present and every value is valid.
fn window_mean(points: &[SeriesPoint], from: i32, to: i32, years: usize) -> f64 {
    let lo = points.partition_point(|p| p.year() < from);
    let hi = points.partition_point(|p| p.year() <= to);
    let slice = &points[lo..hi];

    let mut distinct_years = 0;
    let mut previous = None;
    for p in slice {
        if !p.is_valid() {
            return f64::NAN;
        }
        if previous != Some(p.year()) {
            distinct_years += 1;
            previous = Some(p.year());
        }
    }
    if distinct_years < years {
        return f64::NAN;
    }
    slice.iter().map(|p| p.value).sum::<f64>() / slice.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn annual(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                SeriesPoint::new(NaiveDate::from_ymd_opt(2000 + i as i32, 1, 1).unwrap(), *v)
            })
            .collect()
    }

    #[test]
    fn test_edges_are_nan() {
        let result = moving_average(&annual(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]), 5);
        assert_eq!(result.len(), 7);
        assert!(result[0].value.is_nan());
        assert!(result[1].value.is_nan());
        assert_eq!(result[2].value, 3.0);
        assert_eq!(result[3].value, 4.0);
        assert_eq!(result[4].value, 5.0);
        assert!(result[5].value.is_nan());
        assert!(result[6].value.is_nan());
    }

    #[test]
    fn test_short_series_all_nan() {
        let result = moving_average(&annual(&[1.0, 2.0, 3.0]), 5);
        assert!(result.iter().all(|p| p.value.is_nan()));
    }

    #[test]
    fn test_monthly_window_spans_years() {
        let points: Vec<SeriesPoint> = (2000..2007)
            .flat_map(|year| {
                (1..=12).map(move |month| {
                    SeriesPoint::new(
                        NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
                        (year - 2000) as f64,
                    )
                })
            })
            .collect();
        let result = moving_average(&points, 5);
        assert_eq!(result.len(), 7 * 12);
        // 2000, 2001, 2005 and 2006 have no full five-year window
        assert_eq!(result.iter().filter(|p| p.value.is_nan()).count(), 4 * 12);
        assert_eq!(result[2 * 12].value, 2.0);
        assert_eq!(result[4 * 12 + 11].value, 4.0);
    }

    #[test]
    fn test_missing_year_inside_window() {
        let mut points = annual(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        points.remove(3);
        let result = moving_average(&points, 3);
        // 2002 and 2004 lose 2003 from their window
        assert_eq!(result[1].value, 2.0);
        assert!(result[2].value.is_nan());
        assert!(result[3].value.is_nan());
        assert_eq!(result[4].value, 6.0);
    }

    #[test]
    fn test_nan_propagates() {
        let result = moving_average(&annual(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]), 5);
        assert!(result[2].value.is_nan());
        assert!(result[3].value.is_nan());
    }
}
