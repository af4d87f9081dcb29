//! Validation for geographic coordinates and query rings.

use crate::error::{QuadscanError, Result};
use geo::{Coord, Intersects, Line, LineString, Point};

/// Web-mercator latitude limit, where the projected square ends.
pub const MAX_MERCATOR_LAT: f64 = 85.05112878;
pub const MIN_MERCATOR_LAT: f64 = -MAX_MERCATOR_LAT;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use quadscan::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let palace = Point::new(139.752768, 35.685323);
/// assert!(validate_geographic_point(&palace).is_ok());
///
/// // Invalid longitude
/// let invalid = Point::new(200.0, 35.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(QuadscanError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(QuadscanError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(QuadscanError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(QuadscanError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a point can be projected onto the web-mercator tile grid.
///
/// Stricter than [`validate_geographic_point`]: latitudes beyond
/// ±85.05112878 have no tile.
///
/// ```
/// use quadscan::compute::validation::validate_mercator_point;
/// use geo::Point;
///
/// assert!(validate_mercator_point(&Point::new(0.0, 85.0)).is_ok());
/// assert!(validate_mercator_point(&Point::new(0.0, 89.0)).is_err());
/// ```
pub fn validate_mercator_point(point: &Point) -> Result<()> {
    validate_geographic_point(point)?;

    let y = point.y();
    if !(MIN_MERCATOR_LAT..=MAX_MERCATOR_LAT).contains(&y) {
        return Err(QuadscanError::InvalidCoordinate(format!(
            "Latitude out of web-mercator range [{}, {}]: {}",
            MIN_MERCATOR_LAT, MAX_MERCATOR_LAT, y
        )));
    }

    Ok(())
}

/// Validates multiple points.
pub fn validate_points(points: &[Point]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_geographic_point(point).map_err(|e| {
            QuadscanError::InvalidCoordinate(format!("Point at index {}: {}", idx, e))
        })?;
    }
    Ok(())
}

/// Validates a ring can serve as a query boundary.
///
/// The ring must be closed, hold at least three distinct positions, use
/// valid geographic coordinates and must not cross itself.
///
/// ```
/// use quadscan::compute::validation::validate_ring;
/// use geo::LineString;
///
/// let square = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
/// assert!(validate_ring(&square).is_ok());
///
/// let bowtie = LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
/// assert!(validate_ring(&bowtie).is_err());
/// ```
pub fn validate_ring(ring: &LineString) -> Result<()> {
    let points: Vec<Point> = ring.points().collect();
    validate_points(&points)?;

    if !ring.is_closed() || ring.0.is_empty() {
        return Err(QuadscanError::InvalidRegion(
            "Ring must be closed (first and last positions equal)".to_string(),
        ));
    }

    let mut coords: Vec<Coord> = ring.0.clone();
    coords.dedup();

    // The closing position repeats the first one.
    let distinct = coords.len().saturating_sub(1);
    if distinct < 3 {
        return Err(QuadscanError::InvalidRegion(format!(
            "Ring needs at least 3 distinct positions, got {}",
            distinct
        )));
    }

    let edges: Vec<Line> = coords.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    for i in 0..edges.len() {
        for j in (i + 2)..edges.len() {
            // First and last edges share the closing vertex.
            if i == 0 && j == edges.len() - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return Err(QuadscanError::InvalidRegion(format!(
                    "Ring is self-intersecting (edges {} and {} cross)",
                    i, j
                )));
            }
        }
    }

    Ok(())
}
