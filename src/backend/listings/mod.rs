//! Listings Module
//!
//! Housing listings posted by senior users: browse with filters, full-text
//! search, single fetch, and owner-only create/update/delete.
//!
//! # Module Structure
//!
//! ```text
//! listings/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Query strings, populated views, page envelope
//! └── handlers.rs - HTTP handlers
//! ```

pub mod handlers;
pub mod types;

pub use handlers::{
    create_listing, delete_listing, get_listing, list_listings, search_listings, update_listing,
};
