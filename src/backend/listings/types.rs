//! Listing request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::ListingFilter;
use crate::shared::models::{
    Availability, Listing, ListingStatus, ListingType, Location, Requirements, User,
};
use crate::shared::pagination::PaginationParams;

/// Query string for `GET /api/listings`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(rename = "type")]
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListingQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Status defaults to active; blank city/state values are ignored
    pub fn filter(&self) -> ListingFilter {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        ListingFilter {
            city: non_blank(&self.city),
            state: non_blank(&self.state),
            min_price: self.min_price,
            max_price: self.max_price,
            listing_type: self.listing_type,
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Query string for `GET /api/listings/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Owner fields shown alongside a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Only filled on the single-listing view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl OwnerSummary {
    pub fn new(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
            bio: None,
        }
    }

    pub fn with_bio(user: &User) -> Self {
        Self {
            bio: user.bio.clone(),
            ..Self::new(user)
        }
    }
}

/// A listing with its owner reference resolved
///
/// `owner` is null when the owning user no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedListing {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<OwnerSummary>,
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

impl PopulatedListing {
    pub fn new(listing: Listing, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: listing.id,
            owner,
            title: listing.title,
            description: listing.description,
            listing_type: listing.listing_type,
            price: listing.price,
            location: listing.location,
            amenities: listing.amenities,
            rules: listing.rules,
            images: listing.images,
            availability: listing.availability,
            requirements: listing.requirements,
            status: listing.status,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

/// Paged listing results
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsPage {
    pub listings: Vec<PopulatedListing>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_listings: u64,
}

/// Create and update response
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub message: &'static str,
    pub listing: Listing,
}

/// Bare confirmation
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
