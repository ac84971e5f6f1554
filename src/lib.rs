//! HomeShare - Main Library
//!
//! HomeShare connects senior homeowners with prospective roommates. It is a
//! JSON/HTTP service built on Axum, offering account registration and bearer
//! token authentication, housing listings with filtered and full-text search,
//! and direct messaging between users.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Domain documents and validation
//!   - Users, listings, messages and their enumerations
//!   - Whitelisted update payloads
//!   - Pagination math
//!   - Error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP handlers for auth, listings and messaging
//!   - Bearer token and role middleware
//!   - Document store interface with PostgreSQL and in-memory implementations
//!   - Configuration, state and router assembly
//!
//! # Usage
//!
//! ```rust,no_run
//! use homeshare::backend::server::{config::Config, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let (app, _state) = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `Result<T, E>` for fallible operations
//! - Custom error types in `shared::error`, `backend::store` and `backend::error`
//! - Every HTTP failure renders as `{ "message": ..., "error"?: ... }`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
