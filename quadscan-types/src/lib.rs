//! # quadscan-types
//!
//! Plain data types shared between the quadscan index and the stores it
//! queries:
//!
//! - **Tiles**: [`Tile`], a cell of the web-mercator tile pyramid
//! - **Records**: [`Record`], a point-located entry carrying its precomputed
//!   quadkey
//!
//! Store implementations depend on this crate alone, without pulling in the
//! query engine.
//!
//! ## Examples
//!
//! ```rust
//! use quadscan_types::tile::Tile;
//!
//! let tile = Tile::new(3, 5, 4).unwrap();
//! let parent = tile.parent().unwrap();
//! assert!(parent.is_ancestor_of(&tile));
//! ```

pub mod record;
pub mod tile;

pub use record::Record;
pub use tile::{MAX_ZOOM, Tile};
