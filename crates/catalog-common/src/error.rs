//! Error types for the coverage catalog.

use thiserror::Error;

/// Result type alias using CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Primary error type for catalog operations.
///
/// Identifier lookups that miss, expansions that yield nothing and optional
/// templates that are absent are not errors; they surface as `None` or an
/// empty collection. Only conditions that must abort a request live here.
#[derive(Debug, Error)]
pub enum CatalogError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("requested area {requested} is outside the download grid {grid}")]
    OutsideDownloadGrid { requested: String, grid: String },

    // === Catalog Definition Errors ===
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("Unknown {kind} referenced: {name}")]
    UnknownReference { kind: &'static str, name: String },

    #[error("Invalid download grid: {0}")]
    InvalidGrid(String),

    // === Infrastructure Errors ===
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CatalogError {
    /// Create an OutsideDownloadGrid error.
    pub fn outside_download_grid(requested: impl Into<String>, grid: impl Into<String>) -> Self {
        Self::OutsideDownloadGrid {
            requested: requested.into(),
            grid: grid.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            CatalogError::InvalidParameter { .. }
            | CatalogError::InvalidBbox(_)
            | CatalogError::InvalidTime(_)
            | CatalogError::OutsideDownloadGrid { .. } => 400,

            CatalogError::Upstream(_) => 502,

            _ => 500,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InternalError(format!("JSON error: {}", err))
    }
}
