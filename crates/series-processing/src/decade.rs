//! Decade aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::series::SeriesPoint;

/// Buckets with fewer valid points than this are dropped.
pub const MIN_POINTS_PER_DECADE: usize = 7;

/// Start year of the decade bucket `year` falls into.
///
/// Decades run from year 1 to year 10 of each ten-year block, so 1991..=2000
/// is bucket 1990.
pub fn decade_bucket(year: i32) -> i32 {
    (year - 1).div_euclid(10) * 10
}

/// Mean of each decade bucket, labelled `{bucket}-01-01`, in bucket order.
///
/// `NaN` values are ignored and do not count towards the minimum.
pub fn decade_aggregation(points: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for point in points.iter().filter(|p| p.is_valid()) {
        let entry = buckets.entry(decade_bucket(point.year())).or_insert((0.0, 0));
        entry.0 += point.value;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .filter(|(_, (_, count))| *count >= MIN_POINTS_PER_DECADE)
        .filter_map(|(bucket, (sum, count))| {
            NaiveDate::from_ymd_opt(bucket, 1, 1)
                .map(|date| SeriesPoint::new(date, sum / count as f64))
        })
        .collect()
}
