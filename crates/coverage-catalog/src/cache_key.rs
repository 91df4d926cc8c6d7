//! Download cache keys.
//!
//! An area download is cached under
//! `{configuration}/{coverage}___{bbox|full_extent}___{start|open}-{end|open}.nc`.
//! The bbox is snapped onto the [`DownloadGrid`] first so nearby requests
//! share a key.
//!
//! The key is only a name. Nothing here coordinates concurrent callers:
//! two requests computing the same missing key will both fetch upstream.
//! Callers that need at-most-once fetches must add their own locking around
//! the key.

use catalog_common::{BoundingBox, CatalogResult, DownloadGrid, TemporalRange};
use serde::Serialize;

use crate::coverage::Coverage;

/// Fragment used when no bbox is requested.
pub const FULL_EXTENT: &str = "full_extent";

/// Separator between the parts of a cache file name.
const PART_SEPARATOR: &str = "___";

const CACHE_FILE_EXTENSION: &str = "nc";

/// Everything that identifies one area download.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub coverage: Coverage,
    pub bbox: Option<BoundingBox>,
    pub temporal_range: TemporalRange,
}

/// Cache key of a download together with the snapped box it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadCacheKey {
    pub path: String,
    pub snapped_bbox: Option<BoundingBox>,
}

impl DownloadRequest {
    pub fn new(coverage: Coverage) -> Self {
        Self {
            coverage,
            bbox: None,
            temporal_range: TemporalRange::unbounded(),
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_temporal_range(mut self, temporal_range: TemporalRange) -> Self {
        self.temporal_range = temporal_range;
        self
    }

    /// Snap the requested bbox and build the cache key.
    ///
    /// Fails with `OutsideDownloadGrid` if the bbox misses the grid.
    pub fn cache_key(&self, grid: &DownloadGrid) -> CatalogResult<DownloadCacheKey> {
        let snapped_bbox = self.bbox.as_ref().map(|b| grid.fit_bbox(b)).transpose()?;
        let bbox_fragment = snapped_bbox
            .as_ref()
            .map(BoundingBox::cache_key)
            .unwrap_or_else(|| FULL_EXTENT.to_string());

        let path = format!(
            "{configuration}/{coverage}{sep}{bbox}{sep}{time}.{ext}",
            configuration = self.coverage.configuration_identifier(),
            coverage = self.coverage.identifier(),
            bbox = bbox_fragment,
            time = self.temporal_range.cache_key(),
            sep = PART_SEPARATOR,
            ext = CACHE_FILE_EXTENSION,
        );

        Ok(DownloadCacheKey { path, snapped_bbox })
    }
}
