//! Domain Documents
//!
//! The three persisted document kinds and the sub-documents they share:
//!
//! - `User` - a senior homeowner or a prospective roommate
//! - `Listing` - a room, apartment or house posted by a senior
//! - `Message` - a direct message between two users, optionally about a listing
//!
//! Documents serialize in camelCase with their id emitted as `_id`, which is
//! the shape the web client consumes.

pub mod location;
pub mod user;
pub mod listing;
pub mod message;

pub use location::{Coordinates, GenderPreference, Location};
pub use user::{
    AgeRange, NewUser, Preferences, ProfileUpdate, RegisterRequest, Role, User,
    VerificationStatus,
};
pub use listing::{
    Availability, EmploymentStatus, Listing, ListingStatus, ListingType, ListingUpdate,
    NewListing, Requirements,
};
pub use message::{Message, NewMessage};
