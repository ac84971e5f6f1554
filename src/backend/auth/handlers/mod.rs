//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - User authentication handler
//! └── profile.rs  - Profile read and update handlers
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`get_profile`** - GET /api/auth/profile (authenticated)
//! - **`update_profile`** - PATCH /api/auth/profile (authenticated)

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Profile handlers
pub mod profile;

pub use login::login;
pub use profile::{get_profile, update_profile};
pub use register::register;
pub use types::{AuthResponse, LoginRequest, ProfileResponse};
