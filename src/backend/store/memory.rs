//! In-memory store
//!
//! Keeps every collection in process memory behind a single
//! `tokio::sync::RwLock`. Nothing is persisted; restarting the server starts
//! from an empty store.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    search_words, Conversation, ListingFilter, ListingStore, MessageStore, Page, Store, StoreError,
    UserStore,
};
use crate::shared::models::{
    Listing, ListingStatus, Message, NewListing, NewMessage, NewUser, User, VerificationStatus,
};
use crate::shared::pagination::PageRequest;

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    listings: HashMap<Uuid, Listing>,
    messages: Vec<Message>,
}

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort key putting later documents first when reversed
fn recency(created_at: DateTime<Utc>, id: Uuid) -> (DateTime<Utc>, Uuid) {
    (created_at, id)
}

/// Number of whole-word occurrences of any term in the searchable fields
///
/// No stemming: `rooms` does not match `room`.
fn relevance(listing: &Listing, terms: &[String]) -> usize {
    [
        &listing.title,
        &listing.description,
        &listing.location.city,
        &listing.location.state,
    ]
    .into_iter()
    .flat_map(|field| search_words(field))
    .filter(|word| terms.contains(word))
    .count()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number,
            profile_picture: None,
            bio: None,
            location: user.location,
            preferences: user.preferences,
            verification_status: VerificationStatus::default(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(stored) = inner.users.get_mut(&user.id) {
            *stored = user.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn insert_listing(&self, owner: Uuid, listing: NewListing) -> Result<Listing, StoreError> {
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::now_v7(),
            owner,
            title: listing.title,
            description: listing.description,
            listing_type: listing.listing_type,
            price: listing.price,
            location: listing.location,
            amenities: listing.amenities,
            rules: listing.rules,
            images: listing.images,
            availability: listing.availability,
            requirements: listing.requirements,
            status: listing.status,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .listings
            .insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        Ok(self.inner.read().await.listings.get(&id).cloned())
    }

    async fn find_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<Option<Listing>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .listings
            .get(&id)
            .filter(|listing| listing.owner == owner)
            .cloned())
    }

    async fn find_listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Listing>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.listings.get(id).cloned())
            .collect())
    }

    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(stored) = inner.listings.get_mut(&listing.id) {
            // owner and createdAt stay as stored
            let owner = stored.owner;
            let created_at = stored.created_at;
            *stored = listing.clone();
            stored.owner = owner;
            stored.created_at = created_at;
        }
        Ok(())
    }

    async fn delete_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .listings
            .get(&id)
            .is_some_and(|listing| listing.owner == owner);
        if owned {
            inner.listings.remove(&id);
        }
        Ok(owned)
    }

    async fn query_listings(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError> {
        let inner = self.inner.read().await;
        let mut matches: Vec<&Listing> = inner
            .listings
            .values()
            .filter(|listing| filter.matches(listing))
            .collect();
        matches.sort_by_key(|listing| Reverse(recency(listing.created_at, listing.id)));

        let total = matches.len() as u64;
        let items = page.slice(matches).into_iter().cloned().collect();
        Ok(Page { items, total })
    }

    async fn search_listings(
        &self,
        terms: &[String],
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError> {
        let inner = self.inner.read().await;
        let mut scored: Vec<(usize, &Listing)> = inner
            .listings
            .values()
            .filter(|listing| listing.status == ListingStatus::Active)
            .map(|listing| (relevance(listing, terms), listing))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by_key(|(score, listing)| {
            Reverse((*score, recency(listing.created_at, listing.id)))
        });

        let total = scored.len() as u64;
        let items = page
            .slice(scored)
            .into_iter()
            .map(|(_, listing)| listing.clone())
            .collect();
        Ok(Page { items, total })
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let message = Message {
            id: Uuid::now_v7(),
            sender: message.sender,
            receiver: message.receiver,
            listing: message.listing,
            content: message.content,
            read: false,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.messages.push(message.clone());
        Ok(message)
    }

    async fn conversations_for(
        &self,
        user: Uuid,
        page: PageRequest,
    ) -> Result<Page<Conversation>, StoreError> {
        let inner = self.inner.read().await;
        let mut latest: HashMap<Uuid, &Message> = HashMap::new();
        for message in inner
            .messages
            .iter()
            .filter(|message| message.sender == user || message.receiver == user)
        {
            let counterpart = message.counterpart_of(user);
            if !inner.users.contains_key(&counterpart) {
                continue;
            }
            let newer = latest.get(&counterpart).is_none_or(|current| {
                recency(message.created_at, message.id) > recency(current.created_at, current.id)
            });
            if newer {
                latest.insert(counterpart, message);
            }
        }

        let mut conversations: Vec<Conversation> = latest
            .into_iter()
            .map(|(counterpart, message)| Conversation {
                counterpart,
                last_message: message.clone(),
            })
            .collect();
        conversations.sort_by_key(|conversation| {
            Reverse(recency(
                conversation.last_message.created_at,
                conversation.last_message.id,
            ))
        });

        let total = conversations.len() as u64;
        Ok(Page {
            items: page.slice(conversations),
            total,
        })
    }

    async fn messages_between(
        &self,
        user: Uuid,
        other: Uuid,
        page: PageRequest,
    ) -> Result<Page<Message>, StoreError> {
        let inner = self.inner.read().await;
        let mut messages: Vec<&Message> = inner
            .messages
            .iter()
            .filter(|message| message.is_between(user, other))
            .collect();
        messages.sort_by_key(|message| Reverse(recency(message.created_at, message.id)));

        let total = messages.len() as u64;
        let items = page.slice(messages).into_iter().cloned().collect();
        Ok(Page { items, total })
    }

    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let mut updated = 0;
        for message in inner
            .messages
            .iter_mut()
            .filter(|message| message.sender == sender && message.receiver == receiver && !message.read)
        {
            message.read = true;
            message.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|message| message.receiver == receiver && !message.read)
            .count() as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn close(&self) {
        tracing::debug!("In-memory store dropped on shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::search_terms;
    use crate::shared::models::{
        AgeRange, Availability, GenderPreference, ListingType, Location, Preferences,
        Requirements, Role,
    };
    use chrono::NaiveDate;

    fn location(city: &str) -> Location {
        Location {
            address: "1 Main St".to_string(),
            city: city.to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            coordinates: None,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Role::Roommate,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            phone_number: "555-0100".to_string(),
            location: location("Portland"),
            preferences: Preferences {
                smoking: false,
                pets: false,
                gender: GenderPreference::NoPreference,
                age_range: AgeRange { min: 20, max: 80 },
                max_rent: 1000.0,
                move_in_date: None,
            },
        }
    }

    fn new_listing(title: &str, city: &str, price: f64) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: "A quiet place".to_string(),
            listing_type: ListingType::Room,
            price,
            location: location(city),
            amenities: Vec::new(),
            rules: Vec::new(),
            images: Vec::new(),
            availability: Availability {
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end_date: None,
                is_available: true,
            },
            requirements: Requirements {
                min_age: 18,
                max_age: 99,
                gender: GenderPreference::NoPreference,
                smoking: false,
                pets: false,
                employment_status: Default::default(),
                income_required: false,
                min_income: None,
            },
            status: ListingStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();
        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        store.insert_listing(owner, new_listing("First", "Portland", 500.0)).await.unwrap();
        store.insert_listing(owner, new_listing("Second", "Salem", 700.0)).await.unwrap();
        store.insert_listing(owner, new_listing("Third", "South Portland", 900.0)).await.unwrap();

        let filter = ListingFilter {
            city: Some("portland".to_string()),
            max_price: Some(900.0),
            ..ListingFilter::default()
        };
        let page = store
            .query_listings(&filter, PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();
        let titles: Vec<&str> = page.items.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_search_ranks_by_term_occurrences() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        store.insert_listing(owner, new_listing("Garden room", "Bend", 500.0)).await.unwrap();
        store
            .insert_listing(owner, new_listing("Garden room with garden view", "Bend", 500.0))
            .await
            .unwrap();
        store.insert_listing(owner, new_listing("Attic", "Bend", 500.0)).await.unwrap();

        let page = store
            .search_listings(&["garden".to_string()], PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].title, "Garden room with garden view");
    }

    #[tokio::test]
    async fn test_search_matches_whole_words_only() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        store.insert_listing(owner, new_listing("Cozy attic", "Bend", 500.0)).await.unwrap();
        store
            .insert_listing(owner, new_listing("Spacious bathroom suite", "Bend", 500.0))
            .await
            .unwrap();
        let page_request = PageRequest::new(1, 10).unwrap();

        let page = store.search_listings(&search_terms("room"), page_request).await.unwrap();
        assert_eq!(page.total, 0);

        let page = store.search_listings(&search_terms("a"), page_request).await.unwrap();
        assert_eq!(page.total, 0);

        let page = store.search_listings(&search_terms("BATHROOM"), page_request).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Spacious bathroom suite");
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let listing = store.insert_listing(owner, new_listing("Room", "Bend", 1.0)).await.unwrap();
        assert!(!store.delete_owned_listing(listing.id, Uuid::now_v7()).await.unwrap());
        assert!(store.delete_owned_listing(listing.id, owner).await.unwrap());
        assert!(store.find_listing(listing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conversations_keep_latest_per_counterpart() {
        let store = MemoryStore::new();
        let me = store.insert_user(new_user("me@example.com")).await.unwrap().id;
        let bob = store.insert_user(new_user("bob@example.com")).await.unwrap().id;
        let cy = store.insert_user(new_user("cy@example.com")).await.unwrap().id;

        for (from, to, text) in [(me, bob, "one"), (bob, me, "two"), (cy, me, "three"), (me, bob, "four")] {
            store
                .insert_message(NewMessage::new(from, to, None, text).unwrap())
                .await
                .unwrap();
        }

        let page = store
            .conversations_for(me, PageRequest::new(1, 20).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].counterpart, bob);
        assert_eq!(page.items[0].last_message.content, "four");
        assert_eq!(page.items[1].counterpart, cy);
    }

    #[tokio::test]
    async fn test_mark_read_only_touches_one_direction() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        store.insert_message(NewMessage::new(a, b, None, "hi").unwrap()).await.unwrap();
        store.insert_message(NewMessage::new(b, a, None, "hey").unwrap()).await.unwrap();

        assert_eq!(store.mark_read(a, b).await.unwrap(), 1);
        assert_eq!(store.unread_count(b).await.unwrap(), 0);
        assert_eq!(store.unread_count(a).await.unwrap(), 1);
    }
}
