//! Quadkey-based region queries over ordered key-value stores.
//!
//! Records are indexed by the quadkey of their position at the deepest zoom
//! level. A polygon query is decomposed into tiles, each tile becomes one
//! prefix range scan, and the scans run concurrently before the results are
//! merged, deduplicated and filtered against the exact polygon.
//!
//! ## Features
//! - **Quadkey codec**: reversible tile ↔ key mapping, web-mercator projection
//! - **Tile estimation**: corner heuristic or exact rectangle intersection
//! - **Range keys**: base-4 successor with carry, open-ended last range
//! - **Fan-out**: one tokio task per tile, bounded, fail-fast with timeouts
//!
//! ```rust
//! use quadscan::{QuadIndex, QueryRegion};
//! use geo::Point;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
//! let index = QuadIndex::memory();
//! index.insert(Point::new(139.745, 35.680), json!({ "name": "Shokichi" })).await?;
//! index.insert(Point::new(139.800, 35.700), json!({ "name": "Okiyo" })).await?;
//!
//! let region = QueryRegion::from_corners([
//!     Point::new(139.733427, 35.694091),
//!     Point::new(139.764499, 35.694091),
//!     Point::new(139.764499, 35.674296),
//!     Point::new(139.733427, 35.674296),
//! ])?;
//! let found = index.query(&region, 17).await?;
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].properties()["name"], "Shokichi");
//! # Ok::<(), quadscan::QuadscanError>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod storage;

pub use builder::IndexBuilder;
pub use config::Config;
pub use error::{QuadscanError, Result};
pub use index::{QuadIndex, QueryOutcome, QueryStats};

pub use compute::estimate::{EstimateStrategy, TileEstimator, estimate_tiles};
pub use compute::quadkey::{from_quadkey, quadkey_at, tile_at, tile_bounds, to_quadkey};
pub use compute::range::{KeyRange, UpperBound};
pub use compute::region::QueryRegion;

pub use storage::{MemoryStore, RecordStore, StoreStats};

pub use quadscan_types::{MAX_ZOOM, Record, Tile};

pub use geo::{Point, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{IndexBuilder, QuadIndex, QuadscanError, Result};

    pub use crate::{Config, EstimateStrategy};

    pub use crate::{KeyRange, QueryRegion, Record, Tile};

    pub use crate::{MemoryStore, RecordStore};

    pub use geo::{Point, Polygon, Rect};

    pub use std::time::Duration;
}
