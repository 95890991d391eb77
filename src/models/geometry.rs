//! GeoJSON helpers.
//!
//! Geometries travel as raw `serde_json::Value`s: the backend owns their
//! shape, and the client only ever needs a point's coordinates or the
//! bounding box of an area.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Serializes as the `latitude`/`longitude` pair the backend expects.
impl Serialize for LatLon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("latitude", &self.lat)?;
        map.serialize_entry("longitude", &self.lon)?;
        map.end()
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Degenerate bounds covering a single point.
    pub fn from_point(point: LatLon) -> Self {
        Self {
            south: point.lat,
            west: point.lon,
            north: point.lat,
            east: point.lon,
        }
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: LatLon) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Extract the coordinates of a GeoJSON `Point`.
///
/// Returns `None` for anything that is not a point with two finite numeric
/// coordinates. GeoJSON orders positions as `[lon, lat]`.
pub fn point_coordinates(geometry: &Value) -> Option<LatLon> {
    if geometry.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    position(geometry.get("coordinates")?)
}

/// Compute the bounding box of any GeoJSON object.
///
/// Accepts bare geometries, `GeometryCollection`, `Feature` and
/// `FeatureCollection`. Returns `None` when no valid position is found.
pub fn geojson_bounds(geojson: &Value) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    collect_bounds(geojson, &mut bounds);
    bounds
}

fn collect_bounds(geojson: &Value, bounds: &mut Option<Bounds>) {
    match geojson.get("type").and_then(Value::as_str) {
        Some("Feature") => {
            if let Some(geometry) = geojson.get("geometry") {
                collect_bounds(geometry, bounds);
            }
        }
        Some("FeatureCollection") => {
            for feature in geojson
                .get("features")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect_bounds(feature, bounds);
            }
        }
        Some("GeometryCollection") => {
            for geometry in geojson
                .get("geometries")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect_bounds(geometry, bounds);
            }
        }
        Some(_) => {
            if let Some(coordinates) = geojson.get("coordinates") {
                collect_positions(coordinates, bounds);
            }
        }
        None => {}
    }
}

/// Walk nested coordinate arrays down to individual positions.
fn collect_positions(coordinates: &Value, bounds: &mut Option<Bounds>) {
    if let Some(point) = position(coordinates) {
        match bounds {
            Some(b) => b.extend(point),
            None => *bounds = Some(Bounds::from_point(point)),
        }
        return;
    }
    if let Some(items) = coordinates.as_array() {
        for item in items {
            collect_positions(item, bounds);
        }
    }
}

fn position(value: &Value) -> Option<LatLon> {
    let items = value.as_array()?;
    let lon = items.first()?.as_f64()?;
    let lat = items.get(1)?.as_f64()?;
    if lat.is_finite() && lon.is_finite() {
        Some(LatLon::new(lat, lon))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_coordinates() {
        let point = json!({"type": "Point", "coordinates": [-0.1, 51.5]});
        assert_eq!(point_coordinates(&point), Some(LatLon::new(51.5, -0.1)));

        // Wrong type, missing coordinates, non-numeric values
        assert_eq!(
            point_coordinates(&json!({"type": "Polygon", "coordinates": [-0.1, 51.5]})),
            None
        );
        assert_eq!(point_coordinates(&json!({"type": "Point"})), None);
        assert_eq!(
            point_coordinates(&json!({"type": "Point", "coordinates": ["a", 51.5]})),
            None
        );
        assert_eq!(
            point_coordinates(&json!({"type": "Point", "coordinates": [1.0]})),
            None
        );
    }

    #[test]
    fn test_polygon_bounds() {
        let square = json!({
            "type": "Polygon",
            "coordinates": [[[-1.0, 51.0], [1.0, 51.0], [1.0, 52.0], [-1.0, 52.0], [-1.0, 51.0]]]
        });
        let bounds = geojson_bounds(&square).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                south: 51.0,
                west: -1.0,
                north: 52.0,
                east: 1.0
            }
        );
        assert!(bounds.contains(LatLon::new(51.5, 0.0)));
        assert!(!bounds.contains(LatLon::new(53.0, 0.0)));
        assert_eq!(bounds.center(), LatLon::new(51.5, 0.0));
    }

    #[test]
    fn test_multipolygon_and_feature_bounds() {
        let multi = json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                    [[[5.0, 5.0], [6.0, 5.0], [6.0, 7.0], [5.0, 5.0]]]
                ]
            }
        });
        let bounds = geojson_bounds(&multi).unwrap();
        assert_eq!(bounds.south, 0.0);
        assert_eq!(bounds.north, 7.0);
        assert_eq!(bounds.east, 6.0);

        let collection = json!({"type": "FeatureCollection", "features": [multi]});
        assert_eq!(geojson_bounds(&collection), Some(bounds));
    }

    #[test]
    fn test_bounds_of_empty_geometry() {
        assert_eq!(geojson_bounds(&json!({"type": "Polygon", "coordinates": []})), None);
        assert_eq!(geojson_bounds(&json!({})), None);
    }

    #[test]
    fn test_latlon_serializes_as_latitude_longitude() {
        let value = serde_json::to_value(LatLon::new(51.5, -0.1)).unwrap();
        assert_eq!(value, json!({"latitude": 51.5, "longitude": -0.1}));
    }
}
