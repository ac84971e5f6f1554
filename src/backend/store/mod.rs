//! Document Store
//!
//! Handlers never talk to a database directly. They go through the
//! [`Store`] trait object held in `AppState`, which groups three narrower
//! contracts:
//!
//! - [`UserStore`] - user documents, unique by email
//! - [`ListingStore`] - listings, filtered queries and full-text search
//! - [`MessageStore`] - direct messages, conversation grouping, read flags
//!
//! # Implementations
//!
//! - [`PgStore`] - PostgreSQL via sqlx; used whenever `DATABASE_URL` is set
//! - [`MemoryStore`] - in-process maps behind a `RwLock`; used by the test
//!   suite and when no database is configured
//!
//! Both implementations order by `created_at` and break ties on the id.
//! Ids are UUIDv7, so the id order is also the insertion order.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - Contracts, query types and errors
//! ├── postgres.rs - PostgreSQL implementation
//! └── memory.rs   - In-memory implementation
//! ```

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::models::{
    Listing, ListingStatus, ListingType, Message, NewListing, NewMessage, NewUser, User,
};
use crate::shared::pagination::PageRequest;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    /// The database rejected or failed the query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations could not be applied
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// One page of matches plus the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Latest message exchanged with one counterpart
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub counterpart: Uuid,
    pub last_message: Message,
}

/// Filters for browsing listings
///
/// City and state match case-insensitively anywhere in the stored value;
/// price bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub listing_type: Option<ListingType>,
    pub status: ListingStatus,
}

impl ListingFilter {
    /// In-process evaluation; `PgStore` expresses the same rules in SQL
    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.status != self.status {
            return false;
        }
        if let Some(listing_type) = self.listing_type {
            if listing.listing_type != listing_type {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if listing.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price > max_price {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !contains_ignore_case(&listing.location.city, city) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !contains_ignore_case(&listing.location.state, state) {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// PostgreSQL's `english` stop-word list; these never match in a text search
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now",
];

/// Lowercased alphanumeric words of `text`, in order, stop words removed
pub fn search_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
}

/// Search terms of a query: its `search_words`, deduplicated
///
/// A listing matches when it contains any of the terms as a whole word.
/// Terms are not stemmed here; `PgStore` stems them through `to_tsquery`,
/// `MemoryStore` compares them verbatim.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in search_words(query) {
        if !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

/// User documents
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; fails with `Duplicate("email")` when the email is taken
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fetch every existing user among `ids`, in no particular order
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
    /// Overwrite the mutable profile fields of an existing user
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;
}

/// Listing documents
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert_listing(&self, owner: Uuid, listing: NewListing) -> Result<Listing, StoreError>;
    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError>;
    /// Fetch a listing only if `owner` owns it
    async fn find_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<Option<Listing>, StoreError>;
    async fn find_listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Listing>, StoreError>;
    /// Overwrite the patchable fields of an existing listing
    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError>;
    /// Delete a listing only if `owner` owns it; true when a row was removed
    async fn delete_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
    /// Filtered listings, newest first
    async fn query_listings(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError>;
    /// Active listings matching any of `terms`, most relevant first
    async fn search_listings(
        &self,
        terms: &[String],
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError>;
}

/// Direct messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError>;
    /// Latest message per counterpart of `user`, most recent conversation first
    ///
    /// Counterparts without a user record are left out of both the page and
    /// the total.
    async fn conversations_for(
        &self,
        user: Uuid,
        page: PageRequest,
    ) -> Result<Page<Conversation>, StoreError>;
    /// Messages exchanged between `user` and `other` in either direction, newest first
    async fn messages_between(
        &self,
        user: Uuid,
        other: Uuid,
        page: PageRequest,
    ) -> Result<Page<Message>, StoreError>;
    /// Flag every unread message from `sender` to `receiver` as read
    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, StoreError>;
    async fn unread_count(&self, receiver: Uuid) -> Result<u64, StoreError>;
}

/// The complete document store
#[async_trait]
pub trait Store: UserStore + ListingStore + MessageStore {
    /// Release connections; called once after the server stops
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_split_and_dedup() {
        assert_eq!(
            search_terms("Sunny ROOM, sunny-garden!"),
            vec!["sunny", "room", "garden"]
        );
    }

    #[test]
    fn test_search_terms_punctuation_only() {
        assert!(search_terms("?!-").is_empty());
    }

    #[test]
    fn test_search_terms_drop_stop_words() {
        assert_eq!(search_terms("a room with the garden"), vec!["room", "garden"]);
        assert!(search_terms("A the of").is_empty());
    }

    #[test]
    fn test_search_words_keep_repeats() {
        let words: Vec<String> = search_words("Room, room; ROOM-mate").collect();
        assert_eq!(words, vec!["room", "room", "room", "mate"]);
    }
}
