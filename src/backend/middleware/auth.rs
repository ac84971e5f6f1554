/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user. The middleware reads the
 * bearer token from the `Authorization` header, verifies it, loads the user
 * it names and attaches an `AuthenticatedUser` to the request extensions.
 * Handlers read it back through the `AuthUser` extractor.
 *
 * Every failure (missing header, bad scheme, bad signature, expired token,
 * unknown user) yields the same 401 response.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::shared::models::Role;

/// Identity attached to authenticated requests
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the token from the `Authorization: Bearer <token>` header
/// 2. Verifies signature and expiry
/// 3. Loads the referenced user from the store
/// 4. Attaches an `AuthenticatedUser` to the request extensions
///
/// Returns 401 Unauthorized if any step fails.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            ApiError::Unauthorized
        })?;

    let user_id = app_state.tokens.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        ApiError::Unauthorized
    })?;

    let user = app_state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token names unknown user {}", user_id);
            ApiError::Unauthorized
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`; elsewhere it rejects
/// with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::Unauthorized
            })?;

        Ok(AuthUser(user))
    }
}
