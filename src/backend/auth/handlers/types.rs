/**
 * Authentication Handler Types
 *
 * Request and response bodies used by the register, login and profile
 * handlers. Users are always rendered through `User`'s own serializer,
 * which never emits the password hash.
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::User;

/// Login request
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    /// Email address; matched case-insensitively
    pub email: String,
    /// Plain-text password, verified against the stored hash
    pub password: String,
}

/// Auth response
///
/// Returned by register and login. Contains the bearer token and the
/// stripped user record.
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: User,
    pub token: String,
}

/// Profile update response
#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: User,
}
