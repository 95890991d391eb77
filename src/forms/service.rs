//! Service form fields and payload rules.

use super::{optional_text, required_text, FormKind, NumberInput, ValidationError};
use crate::models::{CoordinatePatch, LatLon, Service, ServiceCreate, ServiceUpdate};

/// Raw service form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFields {
    pub name: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub email: String,
    pub fees: String,
    pub latitude: String,
    pub longitude: String,
}

/// Interpret the latitude/longitude inputs.
///
/// Both valid sets the point, both empty clears it. Anything else (one
/// empty, either unparsable) is ambiguous and leaves the location alone.
fn coordinate_patch(latitude: &str, longitude: &str) -> CoordinatePatch {
    match (NumberInput::parse(latitude), NumberInput::parse(longitude)) {
        (NumberInput::Valid(lat), NumberInput::Valid(lon)) => {
            CoordinatePatch::Set(LatLon::new(lat, lon))
        }
        (NumberInput::Empty, NumberInput::Empty) => CoordinatePatch::Clear,
        _ => CoordinatePatch::Unchanged,
    }
}

pub struct ServiceForm;

impl FormKind for ServiceForm {
    type Entity = Service;
    type Fields = ServiceFields;
    type Create = ServiceCreate;
    type Update = ServiceUpdate;

    const LABEL: &'static str = "Service";

    fn entity_id(entity: &Service) -> i64 {
        entity.id
    }

    fn fields_from(service: &Service) -> ServiceFields {
        let (latitude, longitude) = match service.coordinates() {
            Some(point) => (point.lat.to_string(), point.lon.to_string()),
            None => (String::new(), String::new()),
        };
        ServiceFields {
            name: service.name.clone(),
            description: service.description.clone().unwrap_or_default(),
            category: service.category.clone().unwrap_or_default(),
            url: service.url.clone().unwrap_or_default(),
            email: service.email.clone().unwrap_or_default(),
            fees: service.fees.clone().unwrap_or_default(),
            latitude,
            longitude,
        }
    }

    fn create_payload(fields: &ServiceFields) -> Result<ServiceCreate, ValidationError> {
        let location = match coordinate_patch(&fields.latitude, &fields.longitude) {
            CoordinatePatch::Set(point) => Some(point),
            CoordinatePatch::Clear | CoordinatePatch::Unchanged => None,
        };
        Ok(ServiceCreate {
            name: required_text(&fields.name, "Service Name")?,
            description: optional_text(&fields.description),
            category: optional_text(&fields.category),
            url: optional_text(&fields.url),
            email: optional_text(&fields.email),
            fees: optional_text(&fields.fees),
            location,
        })
    }

    fn update_payload(fields: &ServiceFields) -> Result<ServiceUpdate, ValidationError> {
        Ok(ServiceUpdate {
            name: Some(required_text(&fields.name, "Service Name")?),
            description: Some(optional_text(&fields.description)),
            category: Some(optional_text(&fields.category)),
            url: Some(optional_text(&fields.url)),
            email: Some(optional_text(&fields.email)),
            fees: Some(optional_text(&fields.fees)),
            location: coordinate_patch(&fields.latitude, &fields.longitude),
        })
    }
}
