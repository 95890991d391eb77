//! Claimant records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geometry::{geojson_bounds, Bounds, LatLon};

/// A claimant snapshot as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claimant {
    pub id: i64,
    pub name: String,
    pub home_latitude: f64,
    pub home_longitude: f64,
    /// Area the claimant can travel within, computed server-side.
    #[serde(default)]
    pub travel_extent_geojson: Option<Value>,
}

impl Claimant {
    pub fn home(&self) -> LatLon {
        LatLon::new(self.home_latitude, self.home_longitude)
    }

    pub fn has_travel_extent(&self) -> bool {
        self.travel_extent_geojson
            .as_ref()
            .is_some_and(|v| !v.is_null())
    }

    /// Bounding box of the travel extent, if it has any valid positions.
    pub fn travel_bounds(&self) -> Option<Bounds> {
        self.travel_extent_geojson.as_ref().and_then(geojson_bounds)
    }
}

/// Payload for `POST /claimants/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimantCreate {
    pub name: String,
    pub home_latitude: f64,
    pub home_longitude: f64,
}

/// Payload for `PATCH /claimants/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClaimantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_longitude: Option<f64>,
}
