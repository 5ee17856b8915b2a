//! Integration tests for the LightBnB data-access layer.
//!
//! These tests require a running PostgreSQL server configured via the
//! `LIGHTBNB_TEST_DATABASE_URL` environment variable. They are ignored by
//! default; run them with `cargo test -p lightbnb-tests -- --ignored`.

use chrono::NaiveDate;
use lightbnb::db::{DatabasePool, NewProperty, NewUser, Property, User};
use lightbnb::repository::{PgRepository, Repository};

/// Environment variable holding the test database URL.
pub const TEST_DATABASE_URL_ENV: &str = "LIGHTBNB_TEST_DATABASE_URL";

/// Gets the test database URL from the environment.
///
/// # Panics
/// Panics if `LIGHTBNB_TEST_DATABASE_URL` is not set.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var(TEST_DATABASE_URL_ENV)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL_ENV} must be set to run live tests"))
}

/// Connects to the test database and applies the schema migrations.
///
/// # Panics
/// Panics if the database is not configured, cannot be reached or cannot be
/// migrated.
pub async fn test_repository() -> PgRepository {
    let db = DatabasePool::from_url(&get_database_url())
        .await
        .expect("Failed to connect to test database");
    db.run_migrations()
        .await
        .expect("Failed to migrate test database");
    PgRepository::new(db)
}

/// Generates a unique token to keep rows from different tests apart.
#[must_use]
pub fn unique_token(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}_{}_{}", prefix, ts, counter)
}

/// Registers a user with a unique email.
///
/// # Panics
/// Panics if the insert fails.
pub async fn create_user(repo: &PgRepository, prefix: &str) -> User {
    let token = unique_token(prefix);
    repo.add_user(NewUser {
        name: format!("Guest {token}"),
        email: format!("{token}@example.com"),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    })
    .await
    .expect("Failed to add user")
}

/// Builds a property listing for `owner_id`.
#[must_use]
pub fn sample_property(owner_id: i32, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: format!("Stay in {city}"),
        description: "description".to_string(),
        thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://example.com/cover.jpg".to_string(),
        cost_per_night,
        street: "1 Test Street".to_string(),
        city: city.to_string(),
        province: "British Columbia".to_string(),
        post_code: "V5K 0A1".to_string(),
        country: "Canada".to_string(),
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
    }
}

/// Books `property` for `guest_id` starting on `start_date` and leaves a
/// review with `rating`. Returns the reservation id.
///
/// # Panics
/// Panics if either insert fails.
pub async fn book_and_review(
    repo: &PgRepository,
    property: &Property,
    guest_id: i32,
    start_date: NaiveDate,
    rating: i16,
) -> i32 {
    let pool = repo.database().pool();
    let end_date = start_date + chrono::Duration::days(3);

    let (reservation_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO reservations (start_date, end_date, property_id, guest_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(start_date)
    .bind(end_date)
    .bind(property.id)
    .bind(guest_id)
    .fetch_one(pool)
    .await
    .expect("Failed to insert reservation");

    sqlx::query(
        r#"
        INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(guest_id)
    .bind(property.id)
    .bind(reservation_id)
    .bind(rating)
    .bind("messages")
    .execute(pool)
    .await
    .expect("Failed to insert review");

    reservation_id
}
