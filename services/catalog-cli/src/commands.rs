//! CLI subcommands.
//!
//! Every command returns a JSON value; printing is left to the binary.

use anyhow::{anyhow, Context, Result};
use catalog_common::{
    BoundingBox, CoverageCategory, Decade, ReferencePeriod, Scenario, TemporalRange, YearPeriod,
};
use clap::Subcommand;
use coverage_catalog::{
    expand_catalog, generate_coverages, generate_siblings, get_coverage, ConfigurationStore,
    Coverage, DatasetLocator, DownloadRequest, InMemoryCatalog, Section,
};
use serde::Serialize;
use serde_json::Value;
use series_processing::{derive, ProcessingMethod, TimeSeries, TrendWindow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::config_loader::load_catalog;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every coverage identifier, optionally limited to one navigation section
    List {
        /// Navigation section (simple or advanced)
        #[arg(long, value_parser = parse_section)]
        section: Option<Section>,
    },

    /// Decode a coverage identifier into its axis values
    Decode { identifier: String },

    /// Resolve the dataset locations and layer names of a coverage
    Resolve { identifier: String },

    /// List the coverages that differ from this one only by forecast model
    Siblings { identifier: String },

    /// Compute the download cache key of an area request
    CacheKey {
        identifier: String,

        /// Requested area as minx,miny,maxx,maxy
        #[arg(long)]
        bbox: Option<String>,

        /// Requested dates as start/end; either end may be empty or ".."
        #[arg(long)]
        time: Option<String>,
    },

    /// Derive a series read from a JSON file
    Derive {
        /// JSON file holding a time series
        #[arg(long)]
        input: PathBuf,

        /// Processing method (e.g., moving_average, mann_kendall_trend)
        #[arg(long)]
        method: ProcessingMethod,

        /// First year of the trend window
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year of the trend window
        #[arg(long)]
        end_year: Option<i32>,
    },
}

fn parse_section(s: &str) -> Result<Section, String> {
    match s {
        "simple" => Ok(Section::Simple),
        "advanced" => Ok(Section::Advanced),
        other => Err(format!("unknown section '{}', expected simple or advanced", other)),
    }
}

impl Command {
    /// Whether the command reads the catalog file.
    pub fn needs_catalog(&self) -> bool {
        !matches!(self, Command::Derive { .. })
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// A decoded coverage with its axis values.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageView {
    pub identifier: String,
    pub configuration: String,
    pub category: CoverageCategory,
    pub indicator: String,
    pub spatial_region: String,
    pub year_period: YearPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_period: Option<ReferencePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decade: Option<Decade>,
}

impl From<&Coverage> for CoverageView {
    fn from(coverage: &Coverage) -> Self {
        let identifier = coverage.identifier();
        let configuration = coverage.configuration_identifier();
        match coverage {
            Coverage::Forecast(c) => CoverageView {
                identifier,
                configuration,
                category: CoverageCategory::Forecast,
                indicator: c.configuration.indicator.identifier(),
                spatial_region: c.configuration.spatial_region.name.clone(),
                year_period: c.year_period,
                forecast_model: Some(c.model.name.clone()),
                scenario: Some(c.scenario),
                time_window: c.time_window.as_ref().map(|tw| tw.name.clone()),
                reference_period: None,
                decade: None,
            },
            Coverage::Historical(c) => CoverageView {
                identifier,
                configuration,
                category: CoverageCategory::Historical,
                indicator: c.configuration.indicator.identifier(),
                spatial_region: c.configuration.spatial_region.name.clone(),
                year_period: c.year_period,
                forecast_model: None,
                scenario: None,
                time_window: None,
                reference_period: c.configuration.reference_period,
                decade: c.decade,
            },
        }
    }
}

/// Where a coverage's datasets live.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCoverage {
    pub identifier: String,
    pub main: DatasetLocator,
    pub lower_uncertainty: Option<DatasetLocator>,
    pub upper_uncertainty: Option<DatasetLocator>,
    pub wms_main_layer_name: Option<String>,
    pub wms_secondary_layer_name: Option<String>,
}

impl From<&Coverage> for ResolvedCoverage {
    fn from(coverage: &Coverage) -> Self {
        Self {
            identifier: coverage.identifier(),
            main: coverage.main_locator(),
            lower_uncertainty: coverage.lower_uncertainty_locator(),
            upper_uncertainty: coverage.upper_uncertainty_locator(),
            wms_main_layer_name: coverage.wms_main_layer_name(),
            wms_secondary_layer_name: coverage.wms_secondary_layer_name(),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run `command`, loading the catalog from `config` when needed.
pub fn run(command: &Command, config: &CliConfig) -> Result<Value> {
    if !command.needs_catalog() {
        return run_without_catalog(command);
    }
    let catalog = load_catalog(&config.catalog_path)?;
    run_with_catalog(command, &catalog, config)
}

/// Run a catalog command against an already loaded store.
pub fn run_with_catalog(
    command: &Command,
    catalog: &InMemoryCatalog,
    config: &CliConfig,
) -> Result<Value> {
    match command {
        Command::List { section } => list(catalog, *section),
        Command::Decode { identifier } => {
            let coverage = lookup(catalog, identifier)?;
            Ok(serde_json::to_value(CoverageView::from(&coverage))?)
        }
        Command::Resolve { identifier } => {
            let coverage = lookup(catalog, identifier)?;
            Ok(serde_json::to_value(ResolvedCoverage::from(&coverage))?)
        }
        Command::Siblings { identifier } => {
            let coverage = lookup(catalog, identifier)?;
            let siblings: Vec<String> = generate_siblings(&coverage)
                .iter()
                .map(Coverage::identifier)
                .collect();
            Ok(serde_json::to_value(siblings)?)
        }
        Command::CacheKey {
            identifier,
            bbox,
            time,
        } => cache_key(catalog, config, identifier, bbox.as_deref(), time.as_deref()),
        Command::Derive { .. } => run_without_catalog(command),
    }
}

fn run_without_catalog(command: &Command) -> Result<Value> {
    match command {
        Command::Derive {
            input,
            method,
            start_year,
            end_year,
        } => derive_from_file(
            input,
            *method,
            TrendWindow {
                start_year: *start_year,
                end_year: *end_year,
            },
        ),
        other => Err(anyhow!("Command {:?} needs a catalog", other)),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn lookup(catalog: &InMemoryCatalog, identifier: &str) -> Result<Coverage> {
    get_coverage(catalog, identifier)
        .ok_or_else(|| anyhow!("Coverage not found: {}", identifier))
}

fn list(catalog: &InMemoryCatalog, section: Option<Section>) -> Result<Value> {
    let coverages: Vec<Coverage> = match section {
        Some(section) => catalog
            .configurations_in_section(section)
            .iter()
            .flat_map(generate_coverages)
            .collect(),
        None => expand_catalog(catalog),
    };
    info!(coverages = coverages.len(), section = ?section, "Listed coverages");

    let identifiers: Vec<String> = coverages.iter().map(Coverage::identifier).collect();
    Ok(serde_json::to_value(identifiers)?)
}

fn cache_key(
    catalog: &InMemoryCatalog,
    config: &CliConfig,
    identifier: &str,
    bbox: Option<&str>,
    time: Option<&str>,
) -> Result<Value> {
    let coverage = lookup(catalog, identifier)?;
    let grid = config.download_grid.build()?;

    let mut request = DownloadRequest::new(coverage);
    if let Some(bbox) = bbox {
        let bbox = BoundingBox::from_query_string(bbox)
            .with_context(|| format!("Invalid bbox: {}", bbox))?;
        request = request.with_bbox(bbox);
    }
    if let Some(time) = time {
        let range = TemporalRange::parse(time)
            .with_context(|| format!("Invalid time range: {}", time))?;
        request = request.with_temporal_range(range);
    }

    let key = request.cache_key(&grid)?;
    debug!(path = %key.path, "Computed cache key");
    Ok(serde_json::to_value(key)?)
}

fn derive_from_file(input: &Path, method: ProcessingMethod, window: TrendWindow) -> Result<Value> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read series from {:?}", input))?;
    let series: TimeSeries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse series from {:?}", input))?;

    let derived = derive(&series, method, window)
        .with_context(|| format!("Failed to derive {} from {}", method, series.identifier()))?;
    Ok(serde_json::to_value(derived)?)
}
