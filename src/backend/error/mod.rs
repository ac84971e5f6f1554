//! Backend Error Module
//!
//! This module defines the error taxonomy returned by HTTP handlers and its
//! conversion into JSON responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - ApiError and its status/message mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Response Shape
//!
//! Every error response body is `{ "message": ..., "error"?: ... }`.
//! Handlers return `Result<_, ApiError>` and use `?` on store, token and
//! validation errors; the `From` impls pick the right variant.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use conversion::ErrorBody;
pub use types::{ApiError, ErrorDetail, INTERNAL_ERROR_MESSAGE};
