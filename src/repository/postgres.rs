//! PostgreSQL-backed repository.

use super::Repository;
use crate::db::{
    DatabasePool, GuestReservation, NewProperty, NewUser, Property, PropertyListing, User,
};
use crate::error::RepositoryResult;
use crate::search::{PropertySearch, SearchQuery, SqlParam};
use async_trait::async_trait;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use tracing::{debug, error};

/// Repository that runs every operation as one statement on a pool.
#[derive(Clone)]
pub struct PgRepository {
    db: DatabasePool,
}

impl PgRepository {
    /// Creates a repository over an established pool.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    /// Returns the pool the repository issues statements through.
    #[must_use]
    pub fn database(&self) -> &DatabasePool {
        &self.db
    }
}

/// Binds search parameters in order, `$1` first.
fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: Vec<SqlParam>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value),
            SqlParam::Int(value) => query.bind(value),
            SqlParam::BigInt(value) => query.bind(value),
            SqlParam::Decimal(value) => query.bind(value),
        };
    }
    query
}

#[async_trait]
impl Repository for PgRepository {
    async fn get_user_with_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn get_user_with_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn add_user(&self, user: NewUser) -> RepositoryResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.email)
        .fetch_one(self.db.pool())
        .await?;

        debug!(user_id = created.id, "Inserted user");
        Ok(created)
    }

    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32,
    ) -> RepositoryResult<Vec<GuestReservation>> {
        let rows = sqlx::query_as::<_, GuestReservation>(
            r#"
            SELECT properties.*,
                reservations.id AS reservation_id,
                reservations.start_date,
                reservations.end_date,
                reservations.guest_id,
                avg(property_reviews.rating) AS average_rating
            FROM reservations
            JOIN properties ON properties.id = reservations.property_id
            JOIN property_reviews ON property_reviews.property_id = properties.id
            WHERE reservations.guest_id = $1
            GROUP BY properties.id, reservations.id
            ORDER BY reservations.start_date, reservations.id
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(i64::from(limit))
        .fetch_all(self.db.pool())
        .await?;

        debug!(guest_id, rows = rows.len(), "Fetched guest reservations");
        Ok(rows)
    }

    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: u32,
    ) -> RepositoryResult<Vec<PropertyListing>> {
        let (sql, params) = SearchQuery::build(search, limit).into_parts();
        debug!(%sql, params = ?params, "Running property search");

        let query = bind_params(sqlx::query_as::<_, PropertyListing>(&sql), params);
        match query.fetch_all(self.db.pool()).await {
            Ok(rows) => {
                debug!(rows = rows.len(), "Property search complete");
                Ok(rows)
            }
            Err(e) => {
                error!("Property search failed: {}", e);
                Err(e.into())
            }
        }
    }

    async fn add_property(&self, property: NewProperty) -> RepositoryResult<Property> {
        let result = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id,
                title,
                description,
                thumbnail_photo_url,
                cover_photo_url,
                cost_per_night,
                street,
                city,
                province,
                post_code,
                country,
                parking_spaces,
                number_of_bathrooms,
                number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(&property.country)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(created) => {
                debug!(property_id = created.id, "Inserted property");
                Ok(created)
            }
            Err(e) => {
                error!(owner_id = property.owner_id, "Property insert failed: {}", e);
                Err(e.into())
            }
        }
    }
}
