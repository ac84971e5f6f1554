//! Middleware Module
//!
//! This module contains the HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token authentication for protected routes
//! - **`role`** - Declarative role requirements, checked after `auth`
//! - **`error_detail`** - Development-only error details and panic rendering
//! - **`rate_limit`** - Per-IP request budget
//! - **`security_headers`** - Hardening headers on every response
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let protected = Router::new()
//!     .route("/api/listings", post(create_listing))
//!     .route_layer(from_fn_with_state(RoleRequirement::SENIOR, require_role))
//!     .route_layer(from_fn_with_state(app_state, auth_middleware));
//! ```

pub mod auth;
pub mod error_detail;
pub mod rate_limit;
pub mod role;
pub mod security_headers;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use error_detail::{expose_error_details, handle_panic};
pub use rate_limit::rate_limit;
pub use role::{require_role, RoleRequirement};
pub use security_headers::{security_headers, SECURITY_HEADERS};
