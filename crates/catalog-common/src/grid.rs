//! Coarse download grid used to stabilise area-download cache keys.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BoundingBox, CatalogError, CatalogResult};

/// Tolerance when comparing an edge against a breakpoint.
const SNAP_EPSILON: f64 = 1e-9;

/// A regular lattice of X and Y breakpoints, inclusive of both extremes.
///
/// Built once from configuration and never mutated afterwards. Deserialized
/// grids go through the same checks as [`DownloadGrid::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridBreakpoints")]
pub struct DownloadGrid {
    x_breakpoints: Vec<f64>,
    y_breakpoints: Vec<f64>,
}

/// Unchecked wire form of a [`DownloadGrid`].
#[derive(Deserialize)]
struct GridBreakpoints {
    x_breakpoints: Vec<f64>,
    y_breakpoints: Vec<f64>,
}

impl TryFrom<GridBreakpoints> for DownloadGrid {
    type Error = CatalogError;

    fn try_from(raw: GridBreakpoints) -> CatalogResult<Self> {
        check_breakpoints("x", &raw.x_breakpoints)?;
        check_breakpoints("y", &raw.y_breakpoints)?;
        Ok(Self {
            x_breakpoints: raw.x_breakpoints,
            y_breakpoints: raw.y_breakpoints,
        })
    }
}

/// At least two finite, strictly increasing breakpoints.
fn check_breakpoints(axis: &str, breakpoints: &[f64]) -> CatalogResult<()> {
    if breakpoints.len() < 2 {
        return Err(CatalogError::InvalidGrid(format!(
            "{} axis needs at least two breakpoints, got {}",
            axis,
            breakpoints.len()
        )));
    }
    let increasing = breakpoints.iter().all(|bp| bp.is_finite())
        && breakpoints.windows(2).all(|pair| pair[0] < pair[1]);
    if !increasing {
        return Err(CatalogError::InvalidGrid(format!(
            "{} breakpoints must be finite and strictly increasing",
            axis
        )));
    }
    Ok(())
}

impl DownloadGrid {
    /// Build a grid covering `[min_x, max_x] x [min_y, max_y]` split into
    /// `nx` by `ny` cells.
    pub fn new(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        nx: usize,
        ny: usize,
    ) -> CatalogResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(CatalogError::InvalidGrid(
                "grid must have at least one cell per axis".to_string(),
            ));
        }
        if !(min_x < max_x && min_y < max_y) {
            return Err(CatalogError::InvalidGrid(format!(
                "grid bounds are empty: [{}, {}, {}, {}]",
                min_x, min_y, max_x, max_y
            )));
        }

        Ok(Self {
            x_breakpoints: breakpoints(min_x, max_x, nx),
            y_breakpoints: breakpoints(min_y, max_y, ny),
        })
    }

    /// Ordered X breakpoints.
    pub fn x_breakpoints(&self) -> &[f64] {
        &self.x_breakpoints
    }

    /// Ordered Y breakpoints.
    pub fn y_breakpoints(&self) -> &[f64] {
        &self.y_breakpoints
    }

    /// Outer extent of the grid.
    pub fn bbox(&self) -> BoundingBox {
        let (min_x, max_x) = extent(&self.x_breakpoints);
        let (min_y, max_y) = extent(&self.y_breakpoints);
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }

    /// Snap a query box outward onto the grid.
    ///
    /// The box is clamped to the grid extent, then each minimum edge moves to
    /// the greatest breakpoint not above it and each maximum edge to the
    /// smallest breakpoint not below it. The result always contains the
    /// clamped box.
    ///
    /// A box that only shares an edge with the grid has no area inside it
    /// and is `OutsideDownloadGrid`.
    pub fn fit_bbox(&self, query: &BoundingBox) -> CatalogResult<BoundingBox> {
        let extent = self.bbox();
        let clamped = query.intersection(&extent).ok_or_else(|| {
            debug!(requested = %query, grid = %extent, "bbox does not intersect download grid");
            CatalogError::outside_download_grid(query.to_string(), extent.to_string())
        })?;

        Ok(BoundingBox::new(
            snap_down(&self.x_breakpoints, clamped.min_x),
            snap_down(&self.y_breakpoints, clamped.min_y),
            snap_up(&self.x_breakpoints, clamped.max_x),
            snap_up(&self.y_breakpoints, clamped.max_y),
        ))
    }
}

/// First and last breakpoint. Both axes hold at least two once constructed.
fn extent(breakpoints: &[f64]) -> (f64, f64) {
    match (breakpoints.first(), breakpoints.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (f64::NAN, f64::NAN),
    }
}

fn breakpoints(min: f64, max: f64, cells: usize) -> Vec<f64> {
    let step = (max - min) / cells as f64;
    let mut points: Vec<f64> = (0..cells).map(|i| min + i as f64 * step).collect();
    points.push(max);
    points
}

/// Greatest breakpoint <= value.
fn snap_down(breakpoints: &[f64], value: f64) -> f64 {
    breakpoints
        .iter()
        .rev()
        .find(|bp| **bp <= value + SNAP_EPSILON)
        .or_else(|| breakpoints.first())
        .copied()
        .unwrap_or(value)
}

/// Smallest breakpoint >= value.
fn snap_up(breakpoints: &[f64], value: f64) -> f64 {
    breakpoints
        .iter()
        .find(|bp| **bp >= value - SNAP_EPSILON)
        .or_else(|| breakpoints.last())
        .copied()
        .unwrap_or(value)
}
