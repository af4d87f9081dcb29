use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest zoom level supported by the index.
///
/// Records store their quadkey at this depth, so every coarser tile is a
/// prefix of it.
pub const MAX_ZOOM: u8 = 20;

/// A square cell of the slippy-map tile pyramid.
///
/// Column `x` grows eastward and row `y` grows southward, both in
/// `0..2^zoom`. Tiles order by zoom first, then column, then row.
///
/// # Examples
///
/// ```
/// use quadscan_types::tile::Tile;
///
/// let tile = Tile::new(1, 0, 1).unwrap();
/// assert_eq!(tile.x(), 1);
/// assert_eq!(tile.children().len(), 4);
///
/// // Column 2 does not exist at zoom 1
/// assert!(Tile::new(2, 0, 1).is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tile {
    zoom: u8,
    x: u32,
    y: u32,
}

impl Tile {
    /// Create a tile, returning `None` when the zoom is above [`MAX_ZOOM`] or
    /// a coordinate falls outside the grid at that zoom.
    pub fn new(x: u32, y: u32, zoom: u8) -> Option<Self> {
        if zoom > MAX_ZOOM {
            return None;
        }
        let side = Self::tiles_per_side(zoom);
        if x >= side || y >= side {
            return None;
        }
        Some(Self { zoom, x, y })
    }

    /// The single zoom-0 tile covering the whole world.
    pub fn root() -> Self {
        Self { zoom: 0, x: 0, y: 0 }
    }

    /// Number of tiles along one side of the grid at `zoom`.
    pub fn tiles_per_side(zoom: u8) -> u32 {
        1u32 << zoom.min(MAX_ZOOM)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The enclosing tile one level up, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.zoom == 0 {
            return None;
        }
        Some(Self {
            zoom: self.zoom - 1,
            x: self.x >> 1,
            y: self.y >> 1,
        })
    }

    /// The enclosing tile at a coarser (or equal) zoom.
    pub fn ancestor(&self, zoom: u8) -> Option<Self> {
        if zoom > self.zoom {
            return None;
        }
        let shift = self.zoom - zoom;
        Some(Self {
            zoom,
            x: self.x >> shift,
            y: self.y >> shift,
        })
    }

    /// The four tiles one level down, in quadkey digit order
    /// (north-west, north-east, south-west, south-east).
    ///
    /// At [`MAX_ZOOM`] there is nothing below, so the result is empty.
    pub fn children(&self) -> Vec<Self> {
        if self.zoom >= MAX_ZOOM {
            return Vec::new();
        }
        let (x, y, zoom) = (self.x << 1, self.y << 1, self.zoom + 1);
        vec![
            Self { zoom, x, y },
            Self { zoom, x: x + 1, y },
            Self { zoom, x, y: y + 1 },
            Self {
                zoom,
                x: x + 1,
                y: y + 1,
            },
        ]
    }

    /// Whether `other` lies strictly inside this tile's subtree.
    pub fn is_ancestor_of(&self, other: &Tile) -> bool {
        other.zoom > self.zoom && other.ancestor(self.zoom).as_ref() == Some(self)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_bounds() {
        assert!(Tile::new(0, 0, 0).is_some());
        assert!(Tile::new(1, 0, 0).is_none());
        assert!(Tile::new(1023, 1023, 10).is_some());
        assert!(Tile::new(1024, 0, 10).is_none());
        assert!(Tile::new(0, 0, MAX_ZOOM + 1).is_none());
    }

    #[test]
    fn test_parent_and_ancestor() {
        let tile = Tile::new(13, 6, 4).unwrap();
        assert_eq!(tile.parent(), Tile::new(6, 3, 3));
        assert_eq!(tile.ancestor(1), Tile::new(1, 0, 1));
        assert_eq!(tile.ancestor(0), Some(Tile::root()));
        assert_eq!(tile.ancestor(4), Some(tile));
        assert!(tile.ancestor(5).is_none());
        assert!(Tile::root().parent().is_none());
    }

    #[test]
    fn test_children_round_trip_to_parent() {
        let tile = Tile::new(5, 9, 6).unwrap();
        let children = tile.children();
        assert_eq!(children.len(), 4);
        for child in &children {
            assert_eq!(child.parent(), Some(tile));
            assert!(tile.is_ancestor_of(child));
        }

        let deepest = Tile::new(0, 0, MAX_ZOOM).unwrap();
        assert!(deepest.children().is_empty());
    }

    #[test]
    fn test_is_ancestor_of() {
        let a = Tile::new(1, 1, 1).unwrap();
        let inside = Tile::new(3, 2, 2).unwrap();
        let outside = Tile::new(0, 3, 2).unwrap();
        assert!(a.is_ancestor_of(&inside));
        assert!(!a.is_ancestor_of(&outside));
        assert!(!a.is_ancestor_of(&a));
        assert!(!inside.is_ancestor_of(&a));
    }

    #[test]
    fn test_ordering_and_display() {
        let mut tiles = vec![
            Tile::new(1, 0, 2).unwrap(),
            Tile::new(0, 1, 1).unwrap(),
            Tile::new(0, 3, 2).unwrap(),
        ];
        tiles.sort();
        assert_eq!(tiles[0], Tile::new(0, 1, 1).unwrap());
        assert_eq!(tiles[1], Tile::new(0, 3, 2).unwrap());
        assert_eq!(Tile::new(7, 3, 5).unwrap().to_string(), "5/7/3");
    }
}
