//! Authentication Module
//!
//! Registration, login, bearer tokens and the caller's own profile.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! ├── sessions.rs - JWT token issuance and verification
//! ├── password.rs - bcrypt hashing on the blocking pool
//! └── handlers/   - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: profile + password → user created → token returned
//! 2. **Login**: email + password → credentials verified → token returned
//! 3. **Profile**: token → `auth_middleware` → caller's record
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt (cost 10) and never serialized
//! - Tokens are HS256 JWTs carrying only the user id and expiry
//! - Invalid credentials return 401 without revealing which part was wrong

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod password;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_profile, login, register, update_profile};
pub use sessions::TokenKeys;
