/**
 * API Error Types
 *
 * Every handler returns `Result<_, ApiError>`. Each variant carries a fixed
 * HTTP status and a client-facing message; validation failures additionally
 * carry a detail string that is always shown to the client.
 *
 * # Status Mapping
 *
 * - `Validation`, `InvalidUpdate`, `DuplicateEmail`, `MissingQuery`,
 *   `BadRequest` - 400 Bad Request
 * - `InvalidCredentials`, `Unauthorized` - 401 Unauthorized
 * - `Forbidden` - 403 Forbidden
 * - `NotFound` - 404 Not Found
 * - `RateLimited` - 429 Too Many Requests
 * - `Store`, `Token`, `Password`, `Internal` - 500 Internal Server Error
 *
 * Server-side failures never put their cause in the response body; the
 * cause travels as an [`ErrorDetail`] response extension and is only
 * rendered in development mode.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Generic message for 500 responses
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Cause of a 500 response, attached as a response extension
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// HTTP-facing error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    /// A field failed a domain rule
    #[error("Validation failed: {0}")]
    Validation(SharedError),

    /// A patch named fields outside its whitelist
    #[error("Invalid updates: {}", fields.join(", "))]
    InvalidUpdate {
        /// The offending field names
        fields: Vec<String>,
    },

    /// Registration with an email that already exists
    #[error("Email already registered")]
    DuplicateEmail,

    /// Search without a query string
    #[error("Search query is required")]
    MissingQuery,

    /// The request could not be read (bad JSON, bad query, bad path)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Login with an unknown email or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, invalid or expired token, or token for a vanished user
    #[error("Please authenticate")]
    Unauthorized,

    /// Authenticated caller lacks the required role
    #[error("Access denied")]
    Forbidden,

    /// Resource absent, or not owned by the caller
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Client exceeded its request budget
    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::DisallowedFields { fields } => Self::InvalidUpdate { fields },
            other => Self::Validation(other),
        }
    }
}

impl ApiError {
    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidUpdate { .. }
            | Self::DuplicateEmail
            | Self::MissingQuery
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Store(_) | Self::Token(_) | Self::Password(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::InvalidUpdate { .. } => "Invalid updates".to_string(),
            Self::BadRequest(_) => "Invalid request".to_string(),
            Self::Store(_) | Self::Token(_) | Self::Password(_) | Self::Internal(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Detail shown to every client, for client-side mistakes only
    pub fn public_detail(&self) -> Option<String> {
        match self {
            Self::Validation(err) => Some(err.to_string()),
            Self::InvalidUpdate { fields } => {
                Some(format!("Fields not allowed: {}", fields.join(", ")))
            }
            Self::BadRequest(detail) => Some(detail.clone()),
            _ => None,
        }
    }

    /// Cause of a server-side failure, shown in development mode only
    pub fn private_detail(&self) -> Option<String> {
        if self.status_code().is_server_error() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
