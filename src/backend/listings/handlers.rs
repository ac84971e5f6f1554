/**
 * Listing Handlers
 *
 * # Routes
 *
 * - `GET /api/listings` - filtered browse, newest first
 * - `GET /api/listings/search?q=` - full-text search, most relevant first
 * - `GET /api/listings/{id}` - one listing with owner bio
 * - `POST /api/listings` - create (senior only)
 * - `PATCH /api/listings/{id}` - whitelisted update (senior, owner only)
 * - `DELETE /api/listings/{id}` - delete (senior, owner only)
 *
 * Update and delete look the listing up by id and owner together, so a
 * listing owned by someone else is reported as not found.
 */

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::extract::{ApiJson, ApiPath, ApiQuery};
use crate::backend::listings::types::{
    ListingQuery, ListingResponse, ListingsPage, MessageResponse, OwnerSummary, PopulatedListing,
    SearchQuery,
};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{search_terms, Page};
use crate::shared::models::{Listing, ListingUpdate, NewListing};
use crate::shared::pagination::PageRequest;
use crate::shared::update::WhitelistedUpdate;

/// Default page size for browse and search
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Resolve owners for a page of listings and wrap it in the page envelope
async fn populate_page(
    app_state: &AppState,
    page: Page<Listing>,
    request: PageRequest,
) -> Result<ListingsPage, ApiError> {
    let mut owner_ids: Vec<Uuid> = page.items.iter().map(|listing| listing.owner).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners: HashMap<Uuid, OwnerSummary> = app_state
        .store
        .find_users_by_ids(&owner_ids)
        .await?
        .iter()
        .map(|user| (user.id, OwnerSummary::new(user)))
        .collect();

    let listings = page
        .items
        .into_iter()
        .map(|listing| {
            let owner = owners.get(&listing.owner).cloned();
            PopulatedListing::new(listing, owner)
        })
        .collect();

    Ok(ListingsPage {
        listings,
        current_page: request.page(),
        total_pages: request.total_pages(page.total),
        total_listings: page.total,
    })
}

/// Browse listings
///
/// Filters: `city`, `state` (case-insensitive substring), `minPrice`,
/// `maxPrice` (inclusive), `type`, `status` (default `active`).
pub async fn list_listings(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<Json<ListingsPage>, ApiError> {
    let request = query.pagination().resolve(DEFAULT_PAGE_SIZE)?;
    let filter = query.filter();

    let page = app_state.store.query_listings(&filter, request).await?;
    tracing::debug!(total = page.total, page = request.page(), "Listings queried");

    Ok(Json(populate_page(&app_state, page, request).await?))
}

/// Full-text search over active listings
///
/// # Errors
///
/// * `400 Bad Request` - `q` missing or blank
pub async fn search_listings(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<ListingsPage>, ApiError> {
    let text = query.q.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::MissingQuery);
    }
    let request = query.pagination().resolve(DEFAULT_PAGE_SIZE)?;

    let terms = search_terms(text);
    let page = app_state.store.search_listings(&terms, request).await?;
    tracing::debug!(terms = ?terms, total = page.total, "Listings searched");

    Ok(Json(populate_page(&app_state, page, request).await?))
}

/// Get one listing with its owner's bio
pub async fn get_listing(
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PopulatedListing>, ApiError> {
    let listing = app_state
        .store
        .find_listing(id)
        .await?
        .ok_or(ApiError::NotFound("Listing"))?;

    let owner = app_state
        .store
        .find_user_by_id(listing.owner)
        .await?
        .map(|user| OwnerSummary::with_bio(&user));

    Ok(Json(PopulatedListing::new(listing, owner)))
}

/// Create a listing owned by the caller
///
/// Any `owner` in the payload is ignored.
pub async fn create_listing(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(new_listing): ApiJson<NewListing>,
) -> Result<(StatusCode, Json<ListingResponse>), ApiError> {
    new_listing.validate()?;

    let listing = app_state
        .store
        .insert_listing(auth.user_id, new_listing.normalized())
        .await?;

    tracing::info!(listing_id = %listing.id, owner = %auth.user_id, "Listing created");

    Ok((
        StatusCode::CREATED,
        Json(ListingResponse {
            message: "Listing created successfully",
            listing,
        }),
    ))
}

/// Update a listing the caller owns
///
/// # Errors
///
/// * `400 Bad Request` - Disallowed field or invalid value
/// * `404 Not Found` - No listing with that id owned by the caller
pub async fn update_listing(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ListingResponse>, ApiError> {
    let update = ListingUpdate::from_payload(payload).inspect_err(|e| {
        tracing::warn!(listing_id = %id, "Listing update rejected: {}", e);
    })?;

    let mut listing = app_state
        .store
        .find_owned_listing(id, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("Listing"))?;

    update.apply(&mut listing)?;
    app_state.store.save_listing(&listing).await?;

    tracing::info!(listing_id = %listing.id, "Listing updated");

    Ok(Json(ListingResponse {
        message: "Listing updated successfully",
        listing,
    }))
}

/// Delete a listing the caller owns
pub async fn delete_listing(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !app_state.store.delete_owned_listing(id, auth.user_id).await? {
        return Err(ApiError::NotFound("Listing"));
    }

    tracing::info!(listing_id = %id, "Listing deleted");

    Ok(Json(MessageResponse {
        message: "Listing deleted successfully",
    }))
}
