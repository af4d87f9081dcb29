//! Quadkey codec and web-mercator tile projection.
//!
//! A quadkey for a tile at zoom `Z` is a string of `Z + 1` base-4 digits.
//! The first digit is the world (zoom 0) tile and is always `'0'`; each
//! following digit picks one of the four children, combining one bit of the
//! column (`+1`) and one bit of the row (`+2`), most significant first.
//!
//! Because a child's key extends its parent's key, lexicographic order of
//! keys at one depth follows a depth-first walk of the quad-tree, and every
//! subtree occupies a contiguous key range.

use crate::compute::validation::validate_mercator_point;
use crate::error::{QuadscanError, Result};
use geo::{Point, Rect, coord};
use quadscan_types::{MAX_ZOOM, Tile};
use std::f64::consts::PI;

/// Length of a record key: one root digit plus one digit per level.
pub const INDEX_KEY_LEN: usize = MAX_ZOOM as usize + 1;

/// Encode a tile as its quadkey.
///
/// ```
/// use quadscan::compute::quadkey::to_quadkey;
/// use quadscan::Tile;
///
/// assert_eq!(to_quadkey(&Tile::root()), "0");
/// assert_eq!(to_quadkey(&Tile::new(3, 5, 3).unwrap()), "0213");
/// ```
pub fn to_quadkey(tile: &Tile) -> String {
    let mut key = String::with_capacity(tile.zoom() as usize + 1);
    key.push('0');
    for level in (0..tile.zoom()).rev() {
        let mask = 1u32 << level;
        let mut digit = b'0';
        if tile.x() & mask != 0 {
            digit += 1;
        }
        if tile.y() & mask != 0 {
            digit += 2;
        }
        key.push(digit as char);
    }
    key
}

/// Decode a quadkey produced by [`to_quadkey`].
pub fn from_quadkey(key: &str) -> Result<Tile> {
    let invalid = || QuadscanError::InvalidQuadkey(key.to_string());

    let mut digits = key.bytes();
    if digits.next() != Some(b'0') {
        return Err(invalid());
    }
    if key.len() > INDEX_KEY_LEN {
        return Err(invalid());
    }

    let (mut x, mut y) = (0u32, 0u32);
    for digit in digits {
        let value = match digit {
            b'0'..=b'3' => u32::from(digit - b'0'),
            _ => return Err(invalid()),
        };
        x = (x << 1) | (value & 1);
        y = (y << 1) | (value >> 1);
    }

    let zoom = (key.len() - 1) as u8;
    Tile::new(x, y, zoom).ok_or_else(invalid)
}

/// Project a longitude/latitude point onto the tile grid at `zoom`.
///
/// Points on the eastern or southern edge of the world fall into the last
/// column or row.
///
/// ```
/// use quadscan::compute::quadkey::{tile_at, to_quadkey};
/// use geo::Point;
///
/// let palace = Point::new(139.752768, 35.685323);
/// let tile = tile_at(&palace, 17)?;
/// assert_eq!(to_quadkey(&tile), "013300211231022032");
/// # Ok::<(), quadscan::QuadscanError>(())
/// ```
pub fn tile_at(point: &Point, zoom: u8) -> Result<Tile> {
    check_zoom(zoom)?;
    validate_mercator_point(point)?;

    let side = Tile::tiles_per_side(zoom);
    let n = f64::from(side);
    let last = side - 1;

    let col = ((point.x() + 180.0) / 360.0 * n).floor();
    let lat_rad = point.y().to_radians();
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

    let x = (col.max(0.0) as u32).min(last);
    let y = (row.max(0.0) as u32).min(last);

    Tile::new(x, y, zoom).ok_or_else(|| {
        QuadscanError::InvalidCoordinate(format!(
            "Point ({}, {}) has no tile at zoom {}",
            point.x(),
            point.y(),
            zoom
        ))
    })
}

/// The quadkey of the tile containing `point` at `zoom`.
pub fn quadkey_at(point: &Point, zoom: u8) -> Result<String> {
    tile_at(point, zoom).map(|tile| to_quadkey(&tile))
}

/// Geographic extent of a tile: min is the south-west corner, max the
/// north-east corner.
pub fn tile_bounds(tile: &Tile) -> Rect {
    let n = f64::from(Tile::tiles_per_side(tile.zoom()));
    let west = f64::from(tile.x()) / n * 360.0 - 180.0;
    let east = f64::from(tile.x() + 1) / n * 360.0 - 180.0;
    let north = row_to_lat(f64::from(tile.y()), n);
    let south = row_to_lat(f64::from(tile.y() + 1), n);

    Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north })
}

pub(crate) fn check_zoom(zoom: u8) -> Result<()> {
    if zoom > MAX_ZOOM {
        return Err(QuadscanError::DepthExceeded {
            depth: zoom as usize,
            max: MAX_ZOOM as usize,
        });
    }
    Ok(())
}

fn row_to_lat(row: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::validation::{MAX_MERCATOR_LAT, MIN_MERCATOR_LAT};

    #[test]
    fn test_known_quadkey() {
        let palace = Point::new(139.752768, 35.685323);
        let tile = tile_at(&palace, 17).unwrap();
        assert_eq!(to_quadkey(&tile), "013300211231022032");
        assert_eq!(
            quadkey_at(&palace, MAX_ZOOM).unwrap().len(),
            INDEX_KEY_LEN
        );
    }

    #[test]
    fn test_length_is_zoom_plus_one() {
        let point = Point::new(-74.0060, 40.7128);
        for zoom in 0..=MAX_ZOOM {
            let key = quadkey_at(&point, zoom).unwrap();
            assert_eq!(key.len(), zoom as usize + 1, "zoom {}", zoom);
        }
    }

    #[test]
    fn test_round_trip() {
        let tiles = [
            Tile::root(),
            Tile::new(1, 0, 1).unwrap(),
            Tile::new(116411, 51612, 17).unwrap(),
            Tile::new(0, (1 << 20) - 1, 20).unwrap(),
            Tile::new((1 << 20) - 1, (1 << 20) - 1, 20).unwrap(),
        ];
        for tile in tiles {
            assert_eq!(from_quadkey(&to_quadkey(&tile)).unwrap(), tile);
        }
    }

    #[test]
    fn test_prefix_is_ancestor() {
        let point = Point::new(139.752768, 35.685323);
        let deepest = tile_at(&point, MAX_ZOOM).unwrap();
        let key = to_quadkey(&deepest);
        for zoom in 0..MAX_ZOOM {
            let ancestor = deepest.ancestor(zoom).unwrap();
            assert!(key.starts_with(&to_quadkey(&ancestor)));
            assert_eq!(ancestor, tile_at(&point, zoom).unwrap());
        }
    }

    #[test]
    fn test_from_quadkey_rejects_garbage() {
        let too_long = "0".repeat(INDEX_KEY_LEN + 1);
        for key in ["", "1", "0124", "0a", too_long.as_str()] {
            assert!(
                matches!(from_quadkey(key), Err(QuadscanError::InvalidQuadkey(_))),
                "{:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_invalid_latitude() {
        let result = tile_at(&Point::new(0.0, 89.0), 10);
        assert!(matches!(result, Err(QuadscanError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_zoom_above_max() {
        let result = tile_at(&Point::new(0.0, 0.0), MAX_ZOOM + 1);
        assert!(matches!(
            result,
            Err(QuadscanError::DepthExceeded { depth: 21, max: 20 })
        ));
    }

    #[test]
    fn test_world_edges_clamp() {
        let south_east = Point::new(180.0, MIN_MERCATOR_LAT);
        let tile = tile_at(&south_east, 3).unwrap();
        assert_eq!((tile.x(), tile.y()), (7, 7));

        let north_west = Point::new(-180.0, MAX_MERCATOR_LAT);
        let tile = tile_at(&north_west, 3).unwrap();
        assert_eq!((tile.x(), tile.y()), (0, 0));
    }

    #[test]
    fn test_tile_bounds_contain_point() {
        let point = Point::new(139.752768, 35.685323);
        for zoom in [0, 5, 12, 17, 20] {
            let bounds = tile_bounds(&tile_at(&point, zoom).unwrap());
            assert!(bounds.min().x <= point.x() && point.x() <= bounds.max().x);
            assert!(bounds.min().y <= point.y() && point.y() <= bounds.max().y);
        }

        let world = tile_bounds(&Tile::root());
        assert_eq!(world.min().x, -180.0);
        assert_eq!(world.max().x, 180.0);
        assert!((world.max().y - 85.0511).abs() < 1e-3);
    }
}
