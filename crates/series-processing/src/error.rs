//! Error types for series derivation.

use thiserror::Error;

use crate::series::ProcessingMethod;

/// Result type alias using DerivationError.
pub type DerivationResult<T> = Result<T, DerivationError>;

/// Errors that abort a derivation.
#[derive(Debug, Error, PartialEq)]
pub enum DerivationError {
    /// Mann-Kendall window shorter than the minimum span.
    #[error("trend window {start_year}-{end_year} is shorter than {min_span} years")]
    InsufficientTrendSpan {
        start_year: i32,
        end_year: i32,
        min_span: i32,
    },

    /// Not enough valid points for the method.
    #[error("{method} needs at least {required} valid points, got {available}")]
    NotEnoughData {
        method: ProcessingMethod,
        required: usize,
        available: usize,
    },

    /// Trend window with start after end.
    #[error("invalid trend window: start year {start_year} is after end year {end_year}")]
    InvalidWindow { start_year: i32, end_year: i32 },

    /// Method name that is not one of the supported methods.
    #[error("unknown processing method: {0}")]
    UnknownMethod(String),
}

impl DerivationError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DerivationError::InsufficientTrendSpan { .. }
            | DerivationError::InvalidWindow { .. }
            | DerivationError::UnknownMethod(_) => 400,
            DerivationError::NotEnoughData { .. } => 422,
        }
    }
}
