//! Climate coverage catalog.
//!
//! Configurations describe families of coverages over a set of axes
//! (model, scenario, time window, year period, decade). This crate
//! expands configurations into concrete coverages, encodes and decodes
//! their identifiers, resolves the dataset templates that locate their
//! bytes, and builds the cache keys used for area downloads.
//!
//! ```text
//! ConfigurationStore -> expander -> identifier -> template -> cache_key
//! ```

pub mod cache_key;
pub mod coverage;
pub mod definition;
pub mod expander;
pub mod identifier;
pub mod model;
pub mod store;
pub mod template;

pub use cache_key::{DownloadCacheKey, DownloadRequest, FULL_EXTENT};
pub use coverage::{Coverage, DatasetLocator, ForecastCoverage, HistoricalCoverage};
pub use definition::{
    CatalogDefinition, ForecastConfigurationDefinition, HistoricalConfigurationDefinition,
};
pub use expander::{
    expand_catalog, generate_coverages, generate_forecast_coverages,
    generate_forecast_siblings, generate_historical_coverages, generate_siblings,
};
pub use identifier::{
    get_coverage, get_forecast_coverage, get_forecast_coverage_configuration_by_identifier,
    get_historical_coverage, get_historical_coverage_configuration_by_identifier,
};
pub use model::{
    ClimaticIndicator, CoverageConfiguration, DatasetTemplates, ForecastCoverageConfiguration,
    ForecastModel, ForecastModelGroup, ForecastTimeWindow, HistoricalCoverageConfiguration,
    Section, SectionFlags, SpatialRegion, YearPeriodGroup,
};
pub use store::{ConfigurationStore, InMemoryCatalog};
pub use template::{render_template, LocatorKind};
