//! Server Module
//!
//! Process-level wiring for the HTTP server: configuration loading,
//! application state and app creation.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Environment configuration
//! └── init.rs   - Store selection and app creation
//! ```
//!
//! # Lifecycle
//!
//! 1. `Config::from_env` resolves every setting up front
//! 2. `create_app` connects the store and builds the router
//! 3. `main` serves until a shutdown signal, then calls `Store::close`

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{Config, ConfigError, Environment, RateLimit};
pub use init::create_app;
pub use state::AppState;
