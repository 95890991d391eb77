//! Data models for servicefinder.

mod claimant;
mod geometry;
mod service;

pub use claimant::{Claimant, ClaimantCreate, ClaimantUpdate};
pub use geometry::{geojson_bounds, point_coordinates, Bounds, LatLon};
pub use service::{CoordinatePatch, Service, ServiceCreate, ServiceFilter, ServiceUpdate};
