//! Temporal ranges for area downloads and series windows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Marker used for an unbounded end in cache key fragments.
const OPEN_MARKER: &str = "open";

/// A date range where either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TemporalRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A range with both ends open.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse a `start/end` range.
    ///
    /// Supports:
    /// - Closed range: "1991-01-01/2020-12-31"
    /// - Open start: "../2020-12-31" or "/2020-12-31"
    /// - Open end: "1991-01-01/.." or "1991-01-01/"
    /// - Full datetimes: "1991-01-01T00:00:00Z/2020-12-31T00:00:00Z"
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let (start, end) = s
            .split_once('/')
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

        let range = Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        };

        if let (Some(start), Some(end)) = (range.start, range.end) {
            if start > end {
                return Err(TimeParseError::Inverted(s.to_string()));
            }
        }

        Ok(range)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start.map_or(true, |start| *date >= start) && self.end.map_or(true, |end| *date <= end)
    }

    /// Cache key fragment: `{start|open}-{end|open}` with dates as `YYYYMMDD`.
    pub fn cache_key(&self) -> String {
        let fragment = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y%m%d").to_string())
                .unwrap_or_else(|| OPEN_MARKER.to_string())
        };
        format!("{}-{}", fragment(self.start), fragment(self.end))
    }
}

fn parse_bound(s: &str) -> Result<Option<NaiveDate>, TimeParseError> {
    let s = s.trim();
    if s.is_empty() || s == ".." {
        return Ok(None);
    }
    parse_date(s).map(Some)
}

/// Parse an ISO 8601 date or datetime into a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeParseError> {
    // Full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    // Datetime without timezone
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ndt.date());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Time range start is after its end: {0}")]
    Inverted(String),
}

impl From<TimeParseError> for crate::CatalogError {
    fn from(err: TimeParseError) -> Self {
        crate::CatalogError::InvalidTime(err.to_string())
    }
}
