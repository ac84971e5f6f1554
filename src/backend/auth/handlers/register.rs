/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Validate the payload (email, password length, names, location)
 * 2. Reject an email that is already registered
 * 3. Hash the password with bcrypt
 * 4. Insert the user; verification flags all start false
 * 5. Issue a bearer token for the new user
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::AuthResponse;
use crate::backend::auth::password::hash_password;
use crate::backend::error::ApiError;
use crate::backend::extract::ApiJson;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::models::RegisterRequest;

/// Register handler
///
/// # Returns
///
/// `201 Created` with `{message, user, token}`
///
/// # Errors
///
/// * `400 Bad Request` - Invalid payload or email already registered
/// * `500 Internal Server Error` - Hashing, store or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "margaret@example.com",
///   "password": "securepassword123",
///   "firstName": "Margaret",
///   "lastName": "Hale",
///   "role": "senior",
///   "dateOfBirth": "1948-03-14",
///   "phoneNumber": "555-0100",
///   "location": { "address": "12 Elm St", "city": "Portland", "state": "OR", "zipCode": "97201" },
///   "preferences": { "ageRange": { "min": 25, "max": 60 }, "maxRent": 900 }
/// }
/// ```
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    let email = request.normalized_email();

    if app_state.store.find_user_by_email(&email).await?.is_some() {
        tracing::warn!("Registration with existing email rejected");
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_password(request.password.clone()).await?;
    let user = app_state
        .store
        .insert_user(request.into_new_user(password_hash))
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::DuplicateEmail,
            other => other.into(),
        })?;

    let token = app_state.tokens.create_token(user.id)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
            token,
        }),
    ))
}
