//! Listing Documents
//!
//! A listing is a room, apartment or house posted by a senior user. The
//! `owner` reference is fixed at creation; every later patch goes through
//! [`ListingUpdate`], which cannot name it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_max_chars, require_non_blank, SharedError};
use crate::shared::models::location::{GenderPreference, Location};
use crate::shared::update::{non_null, WhitelistedUpdate};

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Youngest age a listing may require
pub const MIN_REQUIRED_AGE: u32 = 18;

/// Kind of housing on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Room,
    Apartment,
    House,
}

/// Listing lifecycle status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Rented,
    Inactive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Employed,
    Student,
    #[default]
    Any,
}

/// When the housing can be moved into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Availability {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(SharedError::validation(
                    "availability.endDate",
                    "must not be before startDate",
                ));
            }
        }
        Ok(())
    }
}

/// What the owner expects from a roommate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub min_age: u32,
    pub max_age: u32,
    #[serde(default)]
    pub gender: GenderPreference,
    #[serde(default)]
    pub smoking: bool,
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub employment_status: EmploymentStatus,
    #[serde(default)]
    pub income_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_income: Option<f64>,
}

impl Requirements {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.min_age < MIN_REQUIRED_AGE {
            return Err(SharedError::validation(
                "requirements.minAge",
                format!("must be at least {MIN_REQUIRED_AGE}"),
            ));
        }
        if self.max_age < self.min_age {
            return Err(SharedError::validation(
                "requirements.maxAge",
                "must not be below minAge",
            ));
        }
        if let Some(min_income) = self.min_income {
            if !min_income.is_finite() || min_income < 0.0 {
                return Err(SharedError::validation(
                    "requirements.minIncome",
                    "must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// A stored listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning user; immutable
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub price: f64,
    pub location: Location,
    pub amenities: Vec<String>,
    pub rules: Vec<String>,
    pub images: Vec<String>,
    pub availability: Availability,
    pub requirements: Requirements,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing creation body
///
/// Any `owner` in the payload is ignored; the store takes the caller's id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub price: f64,
    pub location: Location,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub availability: Availability,
    pub requirements: Requirements,
    #[serde(default)]
    pub status: ListingStatus,
}

impl NewListing {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_non_blank("title", &self.title)?;
        validate_description(&self.description)?;
        validate_price(self.price)?;
        self.location.validate()?;
        self.availability.validate()?;
        self.requirements.validate()?;
        Ok(())
    }

    /// Trim the title the way it is stored
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }
}

/// Listing patch; `owner` and the timestamps are never patchable
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ListingUpdate {
    #[serde(default, deserialize_with = "non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "non_null")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "non_null")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_null")]
    pub rules: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_null")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_null")]
    pub availability: Option<Availability>,
    #[serde(default, deserialize_with = "non_null")]
    pub requirements: Option<Requirements>,
    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<ListingStatus>,
}

impl WhitelistedUpdate for ListingUpdate {
    const ALLOWED_FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "price",
        "location",
        "amenities",
        "rules",
        "images",
        "availability",
        "requirements",
        "status",
    ];
}

impl ListingUpdate {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(title) = &self.title {
            require_non_blank("title", title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if let Some(availability) = &self.availability {
            availability.validate()?;
        }
        if let Some(requirements) = &self.requirements {
            requirements.validate()?;
        }
        Ok(())
    }

    /// Validate, then overwrite every provided field on `listing`
    pub fn apply(self, listing: &mut Listing) -> Result<(), SharedError> {
        self.validate()?;
        if let Some(title) = self.title {
            listing.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            listing.description = description;
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(location) = self.location {
            listing.location = location;
        }
        if let Some(amenities) = self.amenities {
            listing.amenities = amenities;
        }
        if let Some(rules) = self.rules {
            listing.rules = rules;
        }
        if let Some(images) = self.images {
            listing.images = images;
        }
        if let Some(availability) = self.availability {
            listing.availability = availability;
        }
        if let Some(requirements) = self.requirements {
            listing.requirements = requirements;
        }
        if let Some(status) = self.status {
            listing.status = status;
        }
        listing.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), SharedError> {
    require_non_blank("description", description)?;
    require_max_chars("description", description, MAX_DESCRIPTION_LEN)
}

fn validate_price(price: f64) -> Result<(), SharedError> {
    if !price.is_finite() || price < 0.0 {
        return Err(SharedError::validation("price", "must be a non-negative number"));
    }
    Ok(())
}
