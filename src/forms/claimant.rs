//! Claimant form fields and payload rules.

use super::{required_number, required_text, FormKind, ValidationError};
use crate::models::{Claimant, ClaimantCreate, ClaimantUpdate};

/// Raw claimant form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimantFields {
    pub name: String,
    pub home_latitude: String,
    pub home_longitude: String,
}

impl ClaimantFields {
    /// All three fields are required and both coordinates must parse.
    fn validate(&self) -> Result<(String, f64, f64), ValidationError> {
        Ok((
            required_text(&self.name, "Name")?,
            required_number(&self.home_latitude, "Home latitude")?,
            required_number(&self.home_longitude, "Home longitude")?,
        ))
    }
}

pub struct ClaimantForm;

impl FormKind for ClaimantForm {
    type Entity = Claimant;
    type Fields = ClaimantFields;
    type Create = ClaimantCreate;
    type Update = ClaimantUpdate;

    const LABEL: &'static str = "Claimant";

    fn entity_id(entity: &Claimant) -> i64 {
        entity.id
    }

    fn fields_from(claimant: &Claimant) -> ClaimantFields {
        ClaimantFields {
            name: claimant.name.clone(),
            home_latitude: claimant.home_latitude.to_string(),
            home_longitude: claimant.home_longitude.to_string(),
        }
    }

    fn create_payload(fields: &ClaimantFields) -> Result<ClaimantCreate, ValidationError> {
        let (name, home_latitude, home_longitude) = fields.validate()?;
        Ok(ClaimantCreate {
            name,
            home_latitude,
            home_longitude,
        })
    }

    fn update_payload(fields: &ClaimantFields) -> Result<ClaimantUpdate, ValidationError> {
        let (name, home_latitude, home_longitude) = fields.validate()?;
        Ok(ClaimantUpdate {
            name: Some(name),
            home_latitude: Some(home_latitude),
            home_longitude: Some(home_longitude),
        })
    }
}
