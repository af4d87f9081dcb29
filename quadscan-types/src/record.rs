use geo::Point;
use serde::{Deserialize, Serialize};

/// A point-located entry as held by a store.
///
/// The quadkey is computed once, at the index's maximum depth, when the
/// record is created. Records are never relocated, so there is no way to
/// change the point or the key afterwards.
///
/// # Examples
///
/// ```
/// use quadscan_types::record::Record;
/// use geo::Point;
/// use serde_json::json;
///
/// let record = Record::new(
///     "tanuki-1",
///     Point::new(139.752768, 35.685323),
///     "013300211231022032000",
///     json!({ "name": "Shokichi" }),
/// );
/// assert_eq!(record.id(), "tanuki-1");
/// assert_eq!(record.properties()["name"], "Shokichi");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: String,
    point: Point<f64>,
    quadkey: String,
    #[serde(default)]
    properties: serde_json::Value,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        point: Point<f64>,
        quadkey: impl Into<String>,
        properties: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            point,
            quadkey: quadkey.into(),
            properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Longitude/latitude of the record.
    pub fn point(&self) -> Point<f64> {
        self.point
    }

    /// The indexed key, always at maximum depth.
    pub fn quadkey(&self) -> &str {
        &self.quadkey
    }

    pub fn properties(&self) -> &serde_json::Value {
        &self.properties
    }
}
