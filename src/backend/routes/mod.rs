//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Main router creation and middleware stack
//! └── api_routes.rs - Auth, listing and message endpoints
//! ```
//!
//! Unknown routes fall through to a 404 `{"message": "Route not found"}`.

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::{create_router, with_middleware};
