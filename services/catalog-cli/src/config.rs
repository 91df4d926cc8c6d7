//! CLI runtime settings.

use anyhow::{Context, Result};
use catalog_common::DownloadGrid;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "config/catalog.yaml";

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path of the YAML catalog file
    pub catalog_path: PathBuf,

    /// Download grid used to snap area requests
    pub download_grid: DownloadGridSettings,
}

/// Bounds and resolution of the download grid, in EPSG:4326 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownloadGridSettings {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub nx: usize,
    pub ny: usize,
}

impl Default for DownloadGridSettings {
    /// Roughly 0.1 degree cells over north-eastern Italy.
    fn default() -> Self {
        Self {
            min_lon: 10.0,
            min_lat: 45.0,
            max_lon: 14.0,
            max_lat: 47.2,
            nx: 40,
            ny: 22,
        }
    }
}

impl DownloadGridSettings {
    /// Build the grid, rejecting empty bounds or zero resolution.
    pub fn build(&self) -> Result<DownloadGrid> {
        DownloadGrid::new(
            self.min_lon,
            self.min_lat,
            self.max_lon,
            self.max_lat,
            self.nx,
            self.ny,
        )
        .with_context(|| format!("Invalid download grid settings: {:?}", self))
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DownloadGridSettings::default();

        let catalog_path = lookup("CATALOG_PATH")
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
            .into();

        let download_grid = DownloadGridSettings {
            min_lon: parse_or(&lookup, "DOWNLOAD_GRID_MIN_LON", defaults.min_lon)?,
            min_lat: parse_or(&lookup, "DOWNLOAD_GRID_MIN_LAT", defaults.min_lat)?,
            max_lon: parse_or(&lookup, "DOWNLOAD_GRID_MAX_LON", defaults.max_lon)?,
            max_lat: parse_or(&lookup, "DOWNLOAD_GRID_MAX_LAT", defaults.max_lat)?,
            nx: parse_or(&lookup, "DOWNLOAD_GRID_NX", defaults.nx)?,
            ny: parse_or(&lookup, "DOWNLOAD_GRID_NY", defaults.ny)?,
        };

        Ok(Self {
            catalog_path,
            download_grid,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", name, raw)),
        _ => Ok(default),
    }
}
