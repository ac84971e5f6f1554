/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * An unknown email and a wrong password produce the same 401 so the
 * response never reveals whether an account exists.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::password::verify_password;
use crate::backend::error::ApiError;
use crate::backend::extract::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::models::user::normalize_email;

/// Login handler
///
/// # Returns
///
/// `{message, user, token}` on success
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown email or wrong password
/// * `500 Internal Server Error` - Store or token failure
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(&request.email);

    let Some(user) = app_state.store.find_user_by_email(&email).await? else {
        tracing::warn!("Login for unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "Login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = app_state.tokens.create_token(user.id)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
        token,
    }))
}
