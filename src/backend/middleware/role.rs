//! Role requirements
//!
//! A route declares which roles may call it by layering `require_role`
//! with a `RoleRequirement` as the middleware state. The check runs after
//! `auth_middleware`, so the caller's role is already known.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthenticatedUser;
use crate::shared::models::Role;

/// The set of roles allowed through a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    allowed: &'static [Role],
}

impl RoleRequirement {
    /// Only senior homeowners
    pub const SENIOR: RoleRequirement = RoleRequirement::any_of(&[Role::Senior]);

    pub const fn any_of(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Reject callers whose role is outside the requirement with 403
pub async fn require_role(
    State(requirement): State<RoleRequirement>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(ApiError::Unauthorized)?;

    if !requirement.permits(user.role) {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Role not permitted");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
