/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/profile` - Caller's profile (authenticated)
 * - `PATCH /api/auth/profile` - Update caller's profile (authenticated)
 *
 * ## Listings
 * - `GET /api/listings` - Browse with filters
 * - `GET /api/listings/search` - Full-text search
 * - `GET /api/listings/{id}` - Single listing
 * - `POST /api/listings` - Create (senior)
 * - `PATCH /api/listings/{id}` - Update own listing (senior)
 * - `DELETE /api/listings/{id}` - Delete own listing (senior)
 *
 * ## Messages (all authenticated)
 * - `POST /api/messages` - Send
 * - `GET /api/messages/conversations` - Conversation list
 * - `GET /api/messages/conversations/{userId}` - Messages with one user
 * - `GET /api/messages/unread` - Unread count
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_profile, login, register, update_profile};
use crate::backend::listings::{
    create_listing, delete_listing, get_listing, list_listings, search_listings, update_listing,
};
use crate::backend::messaging::{get_conversations, get_messages, get_unread_count, send_message};
use crate::backend::middleware::{auth_middleware, require_role, RoleRequirement};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected routes are grouped into their own router so that
/// `auth_middleware` (and `require_role` where needed) only wraps them.
/// The role check is layered first so that authentication runs before it.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    router
        .merge(auth_routes(app_state))
        .merge(listing_routes(app_state))
        .merge(message_routes(app_state))
}

fn auth_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/profile", get(get_profile).patch(update_profile))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .merge(protected)
}

fn listing_routes(app_state: &AppState) -> Router<AppState> {
    let senior_only = Router::new()
        .route("/api/listings", post(create_listing))
        .route(
            "/api/listings/{id}",
            axum::routing::patch(update_listing).delete(delete_listing),
        )
        .route_layer(from_fn_with_state(RoleRequirement::SENIOR, require_role))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/api/listings", get(list_listings))
        .route("/api/listings/search", get(search_listings))
        .route("/api/listings/{id}", get(get_listing))
        .merge(senior_only)
}

fn message_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/messages", post(send_message))
        .route("/api/messages/conversations", get(get_conversations))
        .route("/api/messages/conversations/{user_id}", get(get_messages))
        .route("/api/messages/unread", get(get_unread_count))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware))
}
