//! Service records and the payloads used to create or edit them.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::geometry::{point_coordinates, LatLon};

/// A service snapshot as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fees: Option<String>,
    /// GeoJSON point, kept raw so one malformed location cannot fail a whole list.
    #[serde(default)]
    pub location: Option<Value>,
}

impl Service {
    /// Coordinates of the service, if its location is a valid point.
    pub fn coordinates(&self) -> Option<LatLon> {
        self.location.as_ref().and_then(point_coordinates)
    }

    /// Description text for display.
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "No description available.",
        }
    }
}

/// Text filters for the services list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub fees: Option<String>,
}

impl ServiceFilter {
    /// Build a filter, treating blank inputs as "no filter".
    pub fn new(category: Option<&str>, fees: Option<&str>) -> Self {
        fn clean(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }
        Self {
            category: clean(category),
            fees: clean(fees),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.fees.is_none()
    }

    /// Query-string pairs for the services endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(ref category) = self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(ref fees) = self.fees {
            pairs.push(("fees", fees.as_str()));
        }
        pairs
    }
}

/// Payload for `POST /services/`.
///
/// Absent optional fields are omitted entirely; the location is either a
/// complete pair or missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<String>,
    #[serde(flatten)]
    pub location: Option<LatLon>,
}

/// What an update does to a service's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CoordinatePatch {
    /// Leave the stored location alone: neither key is sent.
    #[default]
    Unchanged,
    /// Remove the stored location: both keys are sent as `null`.
    Clear,
    /// Replace the stored location.
    Set(LatLon),
}

impl Serialize for CoordinatePatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CoordinatePatch::Unchanged => serializer.serialize_map(Some(0))?.end(),
            CoordinatePatch::Clear => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("latitude", &Option::<f64>::None)?;
                map.serialize_entry("longitude", &Option::<f64>::None)?;
                map.end()
            }
            CoordinatePatch::Set(point) => point.serialize(serializer),
        }
    }
}

/// Payload for `PATCH /services/{id}`.
///
/// Outer `None` omits a field, `Some(None)` sends an explicit `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Option<String>>,
    #[serde(flatten)]
    pub location: CoordinatePatch,
}
