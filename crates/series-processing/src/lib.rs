//! Time-series derivation for climate coverages and stations.
//!
//! A raw series is turned into a derived series by exactly one processing
//! method:
//!
//! - `no_processing`: identity, relabelled
//! - `loess_smoothing`: local quadratic regression over calendar years
//! - `moving_average`: centered rolling mean, 5 years (11 for forecasts)
//! - `decade_aggregation`: decade means, buckets under 7 points dropped
//! - `mann_kendall_trend`: trend test plus Sen's slope line, 27-year minimum span
//!
//! # Example
//!
//! ```ignore
//! use series_processing::{derive, ProcessingMethod, TrendWindow};
//!
//! let trend = derive(&series, ProcessingMethod::MannKendallTrend, TrendWindow::new(1991, 2020))?;
//! println!("slope per year: {}", trend.trend.unwrap().slope);
//! ```

pub mod decade;
pub mod engine;
pub mod error;
pub mod loess;
pub mod mann_kendall;
pub mod moving_average;
pub mod series;

pub use engine::{derive, derive_many, moving_average_window, resolve_trend_window, TrendWindow};
pub use error::{DerivationError, DerivationResult};
pub use series::{
    DatasetType, ProcessingMethod, ProcessingParameters, ProcessingStep, SeriesLineage,
    SeriesPoint, TimeSeries, TrendDirection, TrendSummary, SERIES_IDENTIFIER_SEPARATOR,
};
