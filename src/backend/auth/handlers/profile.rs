/**
 * Profile Handlers
 *
 * GET /api/auth/profile   - the caller's own record
 * PATCH /api/auth/profile - whitelisted profile update
 *
 * Both routes sit behind `auth_middleware`.
 */

use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::backend::auth::handlers::types::ProfileResponse;
use crate::backend::error::ApiError;
use crate::backend::extract::ApiJson;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{ProfileUpdate, User};
use crate::shared::update::WhitelistedUpdate;

/// Get the caller's profile
///
/// # Errors
///
/// * `404 Not Found` - The user disappeared after authentication
pub async fn get_profile(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .store
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Update the caller's profile
///
/// The payload may only name `firstName`, `lastName`, `phoneNumber`,
/// `profilePicture`, `bio`, `location` and `preferences`. Any other key
/// rejects the whole update and nothing is written.
///
/// # Errors
///
/// * `400 Bad Request` - Disallowed field or invalid value
/// * `404 Not Found` - The user disappeared after authentication
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let update = ProfileUpdate::from_payload(payload).inspect_err(|e| {
        tracing::warn!(user_id = %auth.user_id, "Profile update rejected: {}", e);
    })?;

    let mut user = app_state
        .store
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    update.apply(&mut user)?;
    app_state.store.save_user(&user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user,
    }))
}
