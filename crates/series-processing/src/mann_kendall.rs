//! Mann-Kendall trend test with Sen's slope.
//!
//! Non-seasonal test on the values inside an inclusive year window. The
//! slope is the median of pairwise slopes per calendar year and the fitted
//! line is `slope * (year - start_year) + intercept`.

use std::cmp::Ordering;

use crate::series::{SeriesPoint, TrendDirection, TrendSummary};

/// Smallest accepted `end_year - start_year`.
pub const MIN_TREND_SPAN_YEARS: i32 = 27;

/// Two-sided significance level.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Fewest valid points the test accepts.
pub const MIN_POINTS: usize = 3;

/// Result of a trend fit: statistics plus the fitted line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    pub summary: TrendSummary,
    pub line: Vec<SeriesPoint>,
}

/// Run the test on the valid points of `points` whose year lies in
/// `start_year..=end_year`.
///
/// Returns `None` when fewer than [`MIN_POINTS`] valid points fall in the
/// window. The span check lives in the engine.
pub fn mann_kendall(points: &[SeriesPoint], start_year: i32, end_year: i32) -> Option<TrendFit> {
    let window: Vec<&SeriesPoint> = points
        .iter()
        .filter(|p| (start_year..=end_year).contains(&p.year()))
        .collect();
    let samples: Vec<(f64, f64)> = window
        .iter()
        .filter(|p| p.is_valid())
        .map(|p| (f64::from(p.year()) - f64::from(start_year), p.value))
        .collect();
    let n = samples.len();
    if n < MIN_POINTS {
        return None;
    }

    let s = s_statistic(&samples);
    let var_s = variance_of_s(&samples);
    let z = z_score(s, var_s);
    let p = 2.0 * (1.0 - standard_normal_cdf(z.abs()));
    let significant = p < SIGNIFICANCE_LEVEL;
    let trend = match (significant, z.partial_cmp(&0.0)) {
        (true, Some(Ordering::Greater)) => TrendDirection::Increasing,
        (true, Some(Ordering::Less)) => TrendDirection::Decreasing,
        _ => TrendDirection::NoTrend,
    };
    let tau = s / (0.5 * n as f64 * (n as f64 - 1.0));

    let (slope, intercept) = sens_slope(&samples);

    let line = window
        .iter()
        .map(|p| {
            let x = f64::from(p.year()) - f64::from(start_year);
            SeriesPoint::new(p.date, slope * x + intercept)
        })
        .collect();

    Some(TrendFit {
        summary: TrendSummary {
            trend,
            significant,
            z,
            tau,
            s,
            var_s,
            p,
            slope,
            intercept,
            start_year,
            end_year,
        },
        line,
    })
}

fn s_statistic(samples: &[(f64, f64)]) -> f64 {
    let mut s = 0.0;
    for (i, (_, a)) in samples.iter().enumerate() {
        for (_, b) in &samples[i + 1..] {
            s += sign(b - a);
        }
    }
    s
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Variance of S with the correction for tied values.
fn variance_of_s(samples: &[(f64, f64)]) -> f64 {
    let n = samples.len() as f64;
    let mut values: Vec<f64> = samples.iter().map(|(_, v)| *v).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mut ties = 0.0;
    let mut i = 0;
    while i < values.len() {
        let mut j = i + 1;
        while j < values.len() && values[j] == values[i] {
            j += 1;
        }
        let t = (j - i) as f64;
        ties += t * (t - 1.0) * (2.0 * t + 5.0);
        i = j;
    }

    (n * (n - 1.0) * (2.0 * n + 5.0) - ties) / 18.0
}

/// Normal score with continuity correction.
fn z_score(s: f64, var_s: f64) -> f64 {
    if var_s <= 0.0 {
        return 0.0;
    }
    if s > 0.0 {
        (s - 1.0) / var_s.sqrt()
    } else if s < 0.0 {
        (s + 1.0) / var_s.sqrt()
    } else {
        0.0
    }
}

/// Sen's slope over pairs with distinct x and the matching intercept.
fn sens_slope(samples: &[(f64, f64)]) -> (f64, f64) {
    let mut slopes = Vec::with_capacity(samples.len() * (samples.len() - 1) / 2);
    for (i, (xa, ya)) in samples.iter().enumerate() {
        for (xb, yb) in &samples[i + 1..] {
            if xb != xa {
                slopes.push((yb - ya) / (xb - xa));
            }
        }
    }
    let slope = median(&mut slopes).unwrap_or(0.0);

    let mut xs: Vec<f64> = samples.iter().map(|(x, _)| *x).collect();
    let mut ys: Vec<f64> = samples.iter().map(|(_, y)| *y).collect();
    let intercept = match (median(&mut ys), median(&mut xs)) {
        (Some(my), Some(mx)) => my - mx * slope,
        _ => 0.0,
    };
    (slope, intercept)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Standard normal CDF.
fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, Chebyshev approximation with fractional
/// error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}
