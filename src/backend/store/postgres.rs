/**
 * PostgreSQL Store
 *
 * Sub-documents (location, preferences, availability, requirements) are kept
 * as JSONB columns and string lists as `TEXT[]`, so each document maps onto a
 * single row. Roles, listing types and statuses are Postgres enums.
 *
 * Full-text search runs against the generated `listings.search` tsvector
 * (title, description, city, state) and ranks with `ts_rank`.
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    Conversation, ListingFilter, ListingStore, MessageStore, Page, Store, StoreError, UserStore,
};
use crate::shared::models::{
    Availability, Listing, ListingStatus, ListingType, Location, Message, NewListing, NewMessage,
    NewUser, Preferences, Requirements, Role, User, VerificationStatus,
};
use crate::shared::pagination::PageRequest;

macro_rules! user_columns {
    () => {
        "id, email, password_hash, first_name, last_name, role, date_of_birth, phone_number, \
         profile_picture, bio, location, preferences, verification_status, created_at, updated_at"
    };
}

macro_rules! listing_columns {
    () => {
        "id, owner_id, title, description, listing_type, price, location, amenities, rules, \
         images, availability, requirements, status, created_at, updated_at"
    };
}

macro_rules! message_columns {
    () => {
        "id, sender_id, receiver_id, listing_id, content, read, created_at, updated_at"
    };
}

/// Messages involving `$1`, tagged with the other participant
const EXCHANGED: &str = "SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS counterpart, m.* \
     FROM messages m WHERE m.sender_id = $1 OR m.receiver_id = $1";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role: Role,
    date_of_birth: NaiveDate,
    phone_number: String,
    profile_picture: Option<String>,
    bio: Option<String>,
    location: Json<Location>,
    preferences: Json<Preferences>,
    verification_status: Json<VerificationStatus>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            date_of_birth: row.date_of_birth,
            phone_number: row.phone_number,
            profile_picture: row.profile_picture,
            bio: row.bio,
            location: row.location.0,
            preferences: row.preferences.0,
            verification_status: row.verification_status.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ListingRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    listing_type: ListingType,
    price: f64,
    location: Json<Location>,
    amenities: Vec<String>,
    rules: Vec<String>,
    images: Vec<String>,
    availability: Json<Availability>,
    requirements: Json<Requirements>,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            id: row.id,
            owner: row.owner_id,
            title: row.title,
            description: row.description,
            listing_type: row.listing_type,
            price: row.price,
            location: row.location.0,
            amenities: row.amenities,
            rules: row.rules,
            images: row.images,
            availability: row.availability.0,
            requirements: row.requirements.0,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    listing_id: Option<Uuid>,
    content: String,
    read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            sender: row.sender_id,
            receiver: row.receiver_id,
            listing: row.listing_id,
            content: row.content,
            read: row.read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ConversationRow {
    counterpart: Uuid,
    #[sqlx(flatten)]
    message: MessageRow,
}

/// Store backed by a PostgreSQL connection pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to `database_url` and bring the schema up to date
    ///
    /// # Errors
    ///
    /// Fails if the pool cannot connect or a migration cannot be applied.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Database connection pool created successfully");

        tracing::info!("Running database migrations...");
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations completed successfully");

        Ok(Self { pool })
    }
}

fn unique_violation(field: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Duplicate(field);
            }
        }
        StoreError::Database(err)
    }
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Append the `WHERE` clause for a listing filter
fn push_listing_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    builder.push(" WHERE status = ").push_bind(filter.status);
    if let Some(city) = &filter.city {
        builder
            .push(" AND position(lower(")
            .push_bind(city.clone())
            .push(") in lower(location ->> 'city')) > 0");
    }
    if let Some(state) = &filter.state {
        builder
            .push(" AND position(lower(")
            .push_bind(state.clone())
            .push(") in lower(location ->> 'state')) > 0");
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(listing_type) = filter.listing_type {
        builder.push(" AND listing_type = ").push_bind(listing_type);
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(concat!(
            "INSERT INTO users (",
            user_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, NULL, $9, $10, $11, $12, $12) RETURNING ",
            user_columns!()
        ))
        .bind(Uuid::now_v7())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.date_of_birth)
        .bind(&user.phone_number)
        .bind(Json(&user.location))
        .bind(Json(&user.preferences))
        .bind(Json(VerificationStatus::default()))
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation("email"))?;

        Ok(row.into())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, phone_number = $4, profile_picture = $5,
                bio = $6, location = $7, preferences = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.profile_picture)
        .bind(&user.bio)
        .bind(Json(&user.location))
        .bind(Json(&user.preferences))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn insert_listing(&self, owner: Uuid, listing: NewListing) -> Result<Listing, StoreError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ListingRow>(concat!(
            "INSERT INTO listings (",
            listing_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14) RETURNING ",
            listing_columns!()
        ))
        .bind(Uuid::now_v7())
        .bind(owner)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.listing_type)
        .bind(listing.price)
        .bind(Json(&listing.location))
        .bind(&listing.amenities)
        .bind(&listing.rules)
        .bind(&listing.images)
        .bind(Json(&listing.availability))
        .bind(Json(&listing.requirements))
        .bind(listing.status)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(concat!(
            "SELECT ",
            listing_columns!(),
            " FROM listings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Listing::from))
    }

    async fn find_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(concat!(
            "SELECT ",
            listing_columns!(),
            " FROM listings WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Listing::from))
    }

    async fn find_listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Listing>, StoreError> {
        let rows = sqlx::query_as::<_, ListingRow>(concat!(
            "SELECT ",
            listing_columns!(),
            " FROM listings WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE listings
            SET title = $2, description = $3, price = $4, location = $5, amenities = $6,
                rules = $7, images = $8, availability = $9, requirements = $10, status = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(Json(&listing.location))
        .bind(&listing.amenities)
        .bind(&listing.rules)
        .bind(&listing.images)
        .bind(Json(&listing.availability))
        .bind(Json(&listing.requirements))
        .bind(listing.status)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_owned_listing(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query_listings(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM listings");
        push_listing_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(concat!("SELECT ", listing_columns!(), " FROM listings"));
        push_listing_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = select.build_query_as::<ListingRow>().fetch_all(&self.pool).await?;

        Ok(Page {
            items: rows.into_iter().map(Listing::from).collect(),
            total: to_count(total),
        })
    }

    async fn search_listings(
        &self,
        terms: &[String],
        page: PageRequest,
    ) -> Result<Page<Listing>, StoreError> {
        if terms.is_empty() {
            return Ok(Page {
                items: Vec::new(),
                total: 0,
            });
        }
        // terms are alphanumeric, so joining with `|` yields a valid OR query
        let tsquery = terms.join(" | ");

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listings \
             WHERE status = 'active' AND search @@ to_tsquery('english', $1)",
        )
        .bind(&tsquery)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ListingRow>(concat!(
            "SELECT ",
            listing_columns!(),
            " FROM listings WHERE status = 'active' AND search @@ to_tsquery('english', $1) \
             ORDER BY ts_rank(search, to_tsquery('english', $1)) DESC, created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(&tsquery)
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Listing::from).collect(),
            total: to_count(total),
        })
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, MessageRow>(concat!(
            "INSERT INTO messages (",
            message_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6) RETURNING ",
            message_columns!()
        ))
        .bind(Uuid::now_v7())
        .bind(message.sender)
        .bind(message.receiver)
        .bind(message.listing)
        .bind(&message.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn conversations_for(
        &self,
        user: Uuid,
        page: PageRequest,
    ) -> Result<Page<Conversation>, StoreError> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(DISTINCT exchanged.counterpart) FROM ({EXCHANGED}) exchanged \
             JOIN users u ON u.id = exchanged.counterpart"
        ))
        .bind(user)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ConversationRow>(&format!(
            "WITH latest AS ( \
                 SELECT DISTINCT ON (counterpart) counterpart, {columns} \
                 FROM ({EXCHANGED}) exchanged \
                 ORDER BY counterpart, created_at DESC, id DESC \
             ) \
             SELECT latest.* FROM latest JOIN users u ON u.id = latest.counterpart \
             ORDER BY latest.created_at DESC, latest.id DESC \
             LIMIT $2 OFFSET $3",
            columns = message_columns!()
        ))
        .bind(user)
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(|row| Conversation {
                    counterpart: row.counterpart,
                    last_message: row.message.into(),
                })
                .collect(),
            total: to_count(total),
        })
    }

    async fn messages_between(
        &self,
        user: Uuid,
        other: Uuid,
        page: PageRequest,
    ) -> Result<Page<Message>, StoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)",
        )
        .bind(user)
        .bind(other)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, MessageRow>(concat!(
            "SELECT ",
            message_columns!(),
            " FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user)
        .bind(other)
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Message::from).collect(),
            total: to_count(total),
        })
    }

    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE messages SET read = TRUE, updated_at = $3 \
             WHERE sender_id = $1 AND receiver_id = $2 AND NOT read",
        )
        .bind(sender)
        .bind(receiver)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND NOT read")
                .bind(receiver)
                .fetch_one(&self.pool)
                .await?;

        Ok(to_count(count))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}
