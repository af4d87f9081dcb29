//! Query regions.

use crate::compute::validation::validate_ring;
use crate::error::{QuadscanError, Result};
use geo::{Area, BoundingRect, Coord, Intersects, LineString, Point, Polygon, Rect};

/// A validated polygon to search within.
///
/// Containment is boundary-inclusive: a record lying exactly on an edge of
/// the region is part of the answer.
///
/// # Examples
///
/// ```
/// use quadscan::compute::region::QueryRegion;
/// use geo::{Point, Rect, coord};
///
/// let region = QueryRegion::from_rect(Rect::new(
///     coord! { x: 139.733427, y: 35.674296 },
///     coord! { x: 139.764499, y: 35.694091 },
/// ))?;
/// assert!(region.contains_point(&Point::new(139.752768, 35.685323)));
/// # Ok::<(), quadscan::QuadscanError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRegion {
    polygon: Polygon,
    bounds: Rect,
}

impl QueryRegion {
    /// Wrap a polygon after validating its exterior and interior rings.
    pub fn new(polygon: Polygon) -> Result<Self> {
        validate_ring(polygon.exterior())?;
        for interior in polygon.interiors() {
            validate_ring(interior)?;
        }

        if polygon.unsigned_area() == 0.0 {
            return Err(QuadscanError::InvalidRegion(
                "Region has zero area".to_string(),
            ));
        }

        let bounds = polygon.bounding_rect().ok_or_else(|| {
            QuadscanError::InvalidRegion("Region has no extent".to_string())
        })?;

        Ok(Self { polygon, bounds })
    }

    /// Build a region from an explicitly closed ring of positions.
    ///
    /// Unlike [`Polygon::new`], an open ring is rejected rather than closed
    /// silently.
    pub fn from_ring(coords: Vec<Coord>) -> Result<Self> {
        let ring = LineString::new(coords);
        validate_ring(&ring)?;
        Self::new(Polygon::new(ring, Vec::new()))
    }

    /// Build a region from four corners given clockwise from the top left
    /// (top-left, top-right, bottom-right, bottom-left). The ring is closed
    /// by repeating the first corner.
    ///
    /// The corners need not be axis aligned; a rotated map screen is fine.
    pub fn from_corners(corners: [Point; 4]) -> Result<Self> {
        let mut coords: Vec<Coord> = corners.iter().map(|p| p.0).collect();
        coords.push(corners[0].0);
        Self::from_ring(coords)
    }

    /// An axis-aligned rectangular region.
    pub fn from_rect(rect: Rect) -> Result<Self> {
        Self::new(rect.to_polygon())
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Axis-aligned bounding box of the region.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether `point` lies inside the region or on its boundary.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.polygon.intersects(point)
    }

    /// Whether any part of `rect` touches the region.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        self.polygon.intersects(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn square() -> QueryRegion {
        QueryRegion::from_rect(Rect::new(
            coord! { x: 10.0, y: 10.0 },
            coord! { x: 20.0, y: 20.0 },
        ))
        .unwrap()
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let region = square();
        assert!(region.contains_point(&Point::new(15.0, 15.0)));
        assert!(region.contains_point(&Point::new(10.0, 15.0)));
        assert!(region.contains_point(&Point::new(20.0, 20.0)));
        assert!(!region.contains_point(&Point::new(20.0001, 15.0)));
    }

    #[test]
    fn test_from_corners_closes_ring() {
        let region = QueryRegion::from_corners([
            Point::new(10.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();

        let exterior = region.polygon().exterior();
        assert_eq!(exterior.0.len(), 5);
        assert_eq!(exterior.0.first(), exterior.0.last());
        assert_eq!(region.bounds(), square().bounds());
    }

    #[test]
    fn test_rotated_corners() {
        let region = QueryRegion::from_corners([
            Point::new(139.7493553161621, 35.6949464269382),
            Point::new(139.73888397216797, 35.680655395139816),
            Point::new(139.7556209564209, 35.672358451082985),
            Point::new(139.76652145385742, 35.68546583314841),
        ])
        .unwrap();
        assert!(region.contains_point(&Point::new(139.752768, 35.685323)));
        assert!(!region.contains_point(&Point::new(139.739, 35.694)));
    }

    #[test]
    fn test_from_ring_rejects_open_ring() {
        let result = QueryRegion::from_ring(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
        ]);
        assert!(matches!(result, Err(QuadscanError::InvalidRegion(_))));
    }

    #[test]
    fn test_collinear_ring_has_no_area() {
        let result = QueryRegion::from_ring(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 2.0, y: 0.0 },
            coord! { x: 0.0, y: 0.0 },
        ]);
        assert!(matches!(result, Err(QuadscanError::InvalidRegion(_))));
    }

    #[test]
    fn test_bowtie_corners_rejected() {
        let result = QueryRegion::from_corners([
            Point::new(10.0, 20.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 10.0),
        ]);
        assert!(matches!(result, Err(QuadscanError::InvalidRegion(_))));
    }

    #[test]
    fn test_invalid_coordinate_in_ring() {
        let result = QueryRegion::from_rect(Rect::new(
            coord! { x: 170.0, y: 0.0 },
            coord! { x: 190.0, y: 10.0 },
        ));
        assert!(matches!(result, Err(QuadscanError::InvalidCoordinate(_))));
    }
}
