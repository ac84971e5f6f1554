//! Backend Module
//!
//! The HomeShare HTTP server: an Axum router over a document store, with
//! bearer-token authentication and role checks.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and the middleware stack
//! - **`auth`** - Registration, login, tokens, profile
//! - **`listings`** - Housing listings
//! - **`messaging`** - Direct messages and conversations
//! - **`middleware`** - Authentication, role checks, error details
//! - **`store`** - Persistence (PostgreSQL or in-memory)
//! - **`extract`** - Extractors whose rejections use the API error body
//! - **`error`** - The HTTP error taxonomy
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── main.rs     - Server binary
//! ├── extract.rs  - JSON/query/path extractors
//! ├── server/     - Server initialization and state
//! ├── routes/     - Route configuration
//! ├── auth/       - Authentication
//! ├── listings/   - Listing handlers
//! ├── messaging/  - Messaging handlers
//! ├── middleware/ - Request middleware
//! ├── store/      - Store traits and backends
//! └── error/      - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the store behind `Arc<dyn Store>`, the token keys and
//! the configuration. Handlers receive it through `State`; nothing is
//! global.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user profiles
pub mod auth;

/// Housing listings
pub mod listings;

/// Direct messages
pub mod messaging;

/// Middleware for request processing
pub mod middleware;

/// Document store
pub mod store;

/// Request extractors
pub mod extract;

/// Backend error types
pub mod error;

pub use error::ApiError;
pub use server::{create_app, AppState, Config};
