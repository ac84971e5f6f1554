//! PostgreSQL test fixtures
//!
//! The `PgStore` suite needs a live database named by `DATABASE_URL`. Its
//! tests are `#[ignore]`d; run them with
//! `DATABASE_URL=postgres://... cargo test --test pg_store -- --ignored`.
//!
//! Every test truncates all tables, so tests hold a process-wide lock for
//! as long as they use the database.

use chrono::NaiveDate;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use homeshare::backend::store::{PgStore, UserStore};
use homeshare::shared::models::{
    AgeRange, Availability, GenderPreference, ListingStatus, ListingType, Location, NewListing,
    NewUser, Preferences, Requirements, Role,
};

static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

/// A migrated, empty database for one test
pub struct TestDatabase {
    pub store: PgStore,
    _guard: MutexGuard<'static, ()>,
}

impl TestDatabase {
    /// Connect to `DATABASE_URL`, apply migrations and empty every table
    pub async fn new() -> Self {
        let guard = DATABASE_LOCK.lock().await;
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");

        let store = PgStore::connect(&database_url, 2)
            .await
            .expect("Failed to connect test store");
        cleanup_test_data(&database_url)
            .await
            .expect("Failed to clean test data");

        Self {
            store,
            _guard: guard,
        }
    }

    /// Insert a user and return their id
    pub async fn user(&self, email: &str) -> Uuid {
        self.store
            .insert_user(new_user(email))
            .await
            .expect("Failed to insert test user")
            .id
    }
}

/// Remove all rows while keeping the schema
pub async fn cleanup_test_data(database_url: &str) -> Result<(), sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;
    sqlx::query("TRUNCATE TABLE messages, listings, users CASCADE")
        .execute(&pool)
        .await?;
    pool.close().await;
    Ok(())
}

pub fn location(city: &str) -> Location {
    Location {
        address: "1 Main St".to_string(),
        city: city.to_string(),
        state: "OR".to_string(),
        zip_code: "97201".to_string(),
        coordinates: None,
    }
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: Role::Senior,
        date_of_birth: NaiveDate::from_ymd_opt(1950, 4, 12).unwrap(),
        phone_number: "555-0100".to_string(),
        location: location("Portland"),
        preferences: Preferences {
            smoking: false,
            pets: false,
            gender: GenderPreference::NoPreference,
            age_range: AgeRange { min: 18, max: 99 },
            max_rent: 1200.0,
            move_in_date: None,
        },
    }
}

pub fn new_listing(title: &str, description: &str, city: &str, price: f64) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: description.to_string(),
        listing_type: ListingType::Room,
        price,
        location: location(city),
        amenities: Vec::new(),
        rules: Vec::new(),
        images: Vec::new(),
        availability: Availability {
            start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            end_date: None,
            is_available: true,
        },
        requirements: Requirements {
            min_age: 21,
            max_age: 80,
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
