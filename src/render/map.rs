//! Map rendering: service markers and the selected claimant's travel area.

use serde_json::Value;
use tracing::debug;

use crate::models::{Bounds, Claimant, LatLon, Service};

/// Handle to a layer or layer group on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLon,
    pub popup: Popup,
}

/// Stroke and fill for an overlay polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f32,
    pub fill_opacity: f32,
}

/// Semi-transparent outline used for travel areas.
pub const TRAVEL_AREA_STYLE: OverlayStyle = OverlayStyle {
    color: "#ff7800",
    weight: 2,
    opacity: 0.65,
    fill_opacity: 0.1,
};

/// An interactive map.
pub trait MapSurface {
    fn create_layer_group(&mut self) -> LayerId;
    /// Remove every marker in a group, keeping the group itself.
    fn clear_layer_group(&mut self, group: LayerId);
    fn add_marker(&mut self, group: LayerId, marker: Marker);
    fn add_overlay(&mut self, geometry: &Value, style: &OverlayStyle) -> LayerId;
    fn remove_layer(&mut self, layer: LayerId);
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// Owns the map surface, its service marker group and the travel-area overlay.
pub struct MapRenderer {
    surface: Box<dyn MapSurface>,
    markers: LayerId,
    overlay: Option<LayerId>,
}

impl MapRenderer {
    pub fn new(mut surface: Box<dyn MapSurface>) -> Self {
        let markers = surface.create_layer_group();
        Self {
            surface,
            markers,
            overlay: None,
        }
    }

    /// Replace all service markers. Services without valid coordinates are
    /// skipped. Returns the number of markers placed.
    pub fn render_services(&mut self, services: &[Service]) -> usize {
        self.surface.clear_layer_group(self.markers);

        let mut placed = 0;
        for service in services {
            let Some(position) = service.coordinates() else {
                debug!("Service {} has no location, skipping marker", service.id);
                continue;
            };
            self.surface.add_marker(
                self.markers,
                Marker {
                    position,
                    popup: Popup {
                        title: service.name.clone(),
                        body: service.description.clone().unwrap_or_default(),
                    },
                },
            );
            placed += 1;
        }
        placed
    }

    /// Draw `claimant`'s travel area, replacing any previous overlay, and fit
    /// the camera to it. Returns the fitted bounds.
    pub fn show_travel_area(&mut self, claimant: &Claimant) -> Option<Bounds> {
        self.clear_travel_area();

        let extent = claimant
            .travel_extent_geojson
            .as_ref()
            .filter(|v| !v.is_null())?;
        self.overlay = Some(self.surface.add_overlay(extent, &TRAVEL_AREA_STYLE));

        let bounds = claimant.travel_bounds()?;
        self.surface.fit_bounds(bounds);
        Some(bounds)
    }

    /// Remove the travel-area overlay. The camera is left where it is.
    pub fn clear_travel_area(&mut self) {
        if let Some(layer) = self.overlay.take() {
            self.surface.remove_layer(layer);
        }
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}
