//! Sub-documents shared by users and listings

use serde::{Deserialize, Serialize};

use crate::shared::error::{require_non_blank, SharedError};

/// Optional geocoordinates attached to an address
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_non_blank("location.address", &self.address)?;
        require_non_blank("location.city", &self.city)?;
        require_non_blank("location.state", &self.state)?;
        require_non_blank("location.zipCode", &self.zip_code)?;
        if let Some(coordinates) = &self.coordinates {
            if !(-90.0..=90.0).contains(&coordinates.lat) {
                return Err(SharedError::validation(
                    "location.coordinates.lat",
                    "must be between -90 and 90",
                ));
            }
            if !(-180.0..=180.0).contains(&coordinates.lng) {
                return Err(SharedError::validation(
                    "location.coordinates.lng",
                    "must be between -180 and 180",
                ));
            }
        }
        Ok(())
    }
}

/// Gender preference used by both user preferences and listing requirements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenderPreference {
    Male,
    Female,
    Other,
    #[default]
    NoPreference,
}
