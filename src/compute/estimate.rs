//! Tile estimation: which tiles at a zoom level can hold a match for a region.
//!
//! The estimator walks the rectangular span of tiles under the region's
//! bounding box and keeps those that pass the configured keep-test. When the
//! whole bounding box falls inside a single tile, the walk is skipped.

use crate::compute::quadkey::{check_zoom, tile_at, tile_bounds};
use crate::compute::region::QueryRegion;
use crate::error::{QuadscanError, Result};
use geo::Point;
use quadscan_types::Tile;
use serde::{Deserialize, Serialize};

/// Default cap on the number of tiles in a scanned span.
pub const DEFAULT_MAX_CANDIDATE_TILES: usize = 4096;

/// How a candidate tile is tested against the region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStrategy {
    /// Keep a tile when at least one of its four corners lies in the region.
    ///
    /// This is an approximation: a tile that the region crosses from one side
    /// to the opposite side, without covering any corner, is dropped. Records
    /// in such a tile are missed.
    #[default]
    CornerHeuristic,
    /// Keep a tile when its rectangle intersects the region.
    ExactIntersection,
}

impl EstimateStrategy {
    fn keeps(self, region: &QueryRegion, tile: &Tile) -> bool {
        let bounds = tile_bounds(tile);
        match self {
            EstimateStrategy::CornerHeuristic => {
                let (min, max) = (bounds.min(), bounds.max());
                [
                    Point::new(min.x, max.y),
                    Point::new(max.x, min.y),
                    Point::new(min.x, min.y),
                    Point::new(max.x, max.y),
                ]
                .iter()
                .any(|corner| region.contains_point(corner))
            }
            EstimateStrategy::ExactIntersection => region.intersects_rect(&bounds),
        }
    }
}

/// Decomposes regions into candidate tiles.
///
/// # Examples
///
/// ```
/// use quadscan::compute::estimate::{EstimateStrategy, TileEstimator};
/// use quadscan::compute::region::QueryRegion;
/// use geo::{Rect, coord};
///
/// let region = QueryRegion::from_rect(Rect::new(
///     coord! { x: -100.0, y: 10.0 },
///     coord! { x: 100.0, y: 20.0 },
/// ))?;
///
/// // The strip crosses the middle tiles without covering their corners.
/// let corners = TileEstimator::new(EstimateStrategy::CornerHeuristic);
/// assert!(corners.estimate(&region, 2)?.is_empty());
///
/// let exact = TileEstimator::new(EstimateStrategy::ExactIntersection);
/// assert_eq!(exact.estimate(&region, 2)?.len(), 4);
/// # Ok::<(), quadscan::QuadscanError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TileEstimator {
    strategy: EstimateStrategy,
    max_tiles: usize,
}

impl TileEstimator {
    pub fn new(strategy: EstimateStrategy) -> Self {
        Self {
            strategy,
            max_tiles: DEFAULT_MAX_CANDIDATE_TILES,
        }
    }

    /// Limit the size of the span that will be walked.
    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    pub fn strategy(&self) -> EstimateStrategy {
        self.strategy
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    /// Candidate tiles for `region` at `zoom`, ordered by column then row.
    pub fn estimate(&self, region: &QueryRegion, zoom: u8) -> Result<Vec<Tile>> {
        check_zoom(zoom)?;

        let bounds = region.bounds();
        let min_tile = tile_at(&bounds.min().into(), zoom)?;
        let max_tile = tile_at(&bounds.max().into(), zoom)?;

        if min_tile == max_tile {
            log::debug!("Region fits in tile {}, skipping span scan", min_tile);
            return Ok(vec![min_tile]);
        }

        // Rows grow southward, so the south-west corner has the larger row.
        let (x0, x1) = ordered(min_tile.x(), max_tile.x());
        let (y0, y1) = ordered(min_tile.y(), max_tile.y());

        let candidates = u64::from(x1 - x0 + 1) * u64::from(y1 - y0 + 1);
        if candidates > self.max_tiles as u64 {
            return Err(QuadscanError::TooManyTiles {
                candidates,
                limit: self.max_tiles,
            });
        }

        let tiles: Vec<Tile> = (x0..=x1)
            .flat_map(|x| (y0..=y1).filter_map(move |y| Tile::new(x, y, zoom)))
            .filter(|tile| self.strategy.keeps(region, tile))
            .collect();

        log::debug!(
            "Estimated {} of {} candidate tiles at zoom {} ({:?})",
            tiles.len(),
            candidates,
            zoom,
            self.strategy
        );

        Ok(tiles)
    }
}

impl Default for TileEstimator {
    fn default() -> Self {
        Self::new(EstimateStrategy::default())
    }
}

/// Candidate tiles using the default strategy and limit.
pub fn estimate_tiles(region: &QueryRegion, zoom: u8) -> Result<Vec<Tile>> {
    TileEstimator::default().estimate(region, zoom)
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}
