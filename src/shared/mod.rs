//! Shared Module
//!
//! This module contains the domain documents and validation rules used by
//! every backend component. Nothing in here touches HTTP; the types are plain
//! serde structures that the store persists and the handlers render.

/// Domain documents (users, listings, messages)
pub mod models;

/// Shared error types
pub mod error;

/// Whitelisted partial updates
pub mod update;

/// Page/limit handling
pub mod pagination;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use pagination::{PageRequest, PaginationParams};
pub use update::WhitelistedUpdate;
