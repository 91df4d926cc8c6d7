//! Common types and utilities shared across the climate coverage catalog crates.

pub mod axes;
pub mod bbox;
pub mod error;
pub mod grid;
pub mod time;

pub use axes::{
    AggregationPeriod, CoverageCategory, Decade, MeasureType, ReferencePeriod, Scenario,
    UnknownAxisValue, YearPeriod,
};
pub use bbox::{BboxParseError, BoundingBox};
pub use error::{CatalogError, CatalogResult};
pub use grid::DownloadGrid;
pub use time::{TemporalRange, TimeParseError};

/// Separator between identifier segments.
pub const IDENTIFIER_SEPARATOR: char = '-';

/// Check that a name can be used as a single identifier segment.
///
/// Names become `-`-separated identifier segments, so they must be non-empty
/// and must not contain the separator themselves.
pub fn validate_segment_name(name: &str) -> CatalogResult<()> {
    if name.is_empty() {
        return Err(CatalogError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".to_string(),
        });
    }
    if name.contains(IDENTIFIER_SEPARATOR) {
        return Err(CatalogError::InvalidName {
            name: name.to_string(),
            reason: format!("name must not contain '{}'", IDENTIFIER_SEPARATOR),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_name() {
        assert!(validate_segment_name("tas").is_ok());
        assert!(validate_segment_name("model_ensemble").is_ok());
        assert!(validate_segment_name("").is_err());
        assert!(matches!(
            validate_segment_name("arpa-v"),
            Err(CatalogError::InvalidName { .. })
        ));
    }
}
