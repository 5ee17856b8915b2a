//! In-memory repository.
//!
//! Keeps the four tables in process memory behind a single lock. Identifiers
//! are assigned as one past the current maximum, under the write lock, so
//! concurrent inserts never share an id. Averages are rounded to the scale
//! the store reports for `avg()`. Searches reuse the filter list from
//! [`crate::search`], and a property with no reviews is invisible to searches
//! and reservation listings exactly as with the relational join.

use super::Repository;
use crate::db::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, PropertyReview,
    Reservation, User,
};
use crate::error::{RepositoryError, RepositoryResult};
use crate::search::PropertySearch;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, info};


#[derive(Default)]
struct Tables {
    users: Vec<User>,
    properties: Vec<Property>,
    reservations: Vec<Reservation>,
    reviews: Vec<PropertyReview>,
}

impl Tables {
    fn average_rating(&self, property_id: i32) -> Option<Decimal> {
        let (total, count) = self
            .reviews
            .iter()
            .filter(|review| review.property_id == property_id)
            .fold((0i64, 0i64), |(total, count), review| {
                (total + i64::from(review.rating), count + 1)
            });

        (count > 0).then(|| {
            let average = Decimal::from(total) / Decimal::from(count);
            average.round_dp_with_strategy(
                average_scale(average),
                RoundingStrategy::MidpointAwayFromZero,
            )
        })
    }

    fn property(&self, id: i32) -> Option<&Property> {
        self.properties.iter().find(|property| property.id == id)
    }

    fn has_user(&self, id: i32) -> bool {
        self.users.iter().any(|user| user.id == id)
    }
}

/// Fractional digits PostgreSQL keeps in `avg()` of integers: sixteen
/// significant digits, counted in base-10000 groups.
fn average_scale(average: Decimal) -> u32 {
    let magnitude = average.abs();
    if magnitude >= Decimal::from(10_000) {
        12
    } else if magnitude >= Decimal::ONE || magnitude.is_zero() {
        16
    } else {
        20
    }
}

fn next_id(table: &str, ids: impl Iterator<Item = i32>) -> RepositoryResult<i32> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| RepositoryError::IdSpaceExhausted(table.to_string()))
}

/// Fixture file layout: a plain array, or an object keyed by id.
#[derive(Deserialize)]
#[serde(untagged)]
enum Fixture<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> Fixture<T> {
    fn into_rows(self) -> Vec<T> {
        match self {
            Fixture::List(rows) => rows,
            Fixture::Keyed(rows) => rows.into_values().collect(),
        }
    }
}

fn parse_fixture<T: DeserializeOwned>(json: &str) -> RepositoryResult<Vec<T>> {
    let fixture: Fixture<T> = serde_json::from_str(json)?;
    Ok(fixture.into_rows())
}

/// Repository holding every table in memory.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository preloaded from JSON user and property fixtures.
    ///
    /// Each fixture is either an array of records or an object mapping ids
    /// to records.
    ///
    /// # Errors
    /// Returns [`RepositoryError::InvalidFixture`] if either document does
    /// not decode.
    pub fn from_json(users_json: &str, properties_json: &str) -> RepositoryResult<Self> {
        let mut users: Vec<User> = parse_fixture(users_json)?;
        let mut properties: Vec<Property> = parse_fixture(properties_json)?;
        users.sort_by_key(|user| user.id);
        properties.sort_by_key(|property| property.id);

        info!(
            users = users.len(),
            properties = properties.len(),
            "Loaded fixtures"
        );

        Ok(Self {
            tables: RwLock::new(Tables {
                users,
                properties,
                ..Tables::default()
            }),
        })
    }

    /// Records a reservation of `property_id` by `guest_id`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the property or guest does
    /// not exist.
    pub fn insert_reservation(
        &self,
        property_id: i32,
        guest_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Reservation> {
        let mut tables = self.tables.write();
        if tables.property(property_id).is_none() {
            return Err(RepositoryError::NotFound(format!("property {property_id}")));
        }
        if !tables.has_user(guest_id) {
            return Err(RepositoryError::NotFound(format!("user {guest_id}")));
        }

        let reservation = Reservation {
            id: next_id("reservations", tables.reservations.iter().map(|r| r.id))?,
            start_date,
            end_date,
            property_id,
            guest_id,
        };
        tables.reservations.push(reservation.clone());
        Ok(reservation)
    }

    /// Records the guest's review of the stay `reservation_id`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the reservation does not
    /// exist.
    pub fn insert_review(
        &self,
        reservation_id: i32,
        rating: i16,
        message: Option<String>,
    ) -> RepositoryResult<PropertyReview> {
        let mut tables = self.tables.write();
        let (guest_id, property_id) = tables
            .reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .map(|r| (r.guest_id, r.property_id))
            .ok_or_else(|| RepositoryError::NotFound(format!("reservation {reservation_id}")))?;

        let review = PropertyReview {
            id: next_id("property_reviews", tables.reviews.iter().map(|r| r.id))?,
            guest_id,
            property_id,
            reservation_id,
            rating,
            message,
        };
        tables.reviews.push(review.clone());
        Ok(review)
    }

    /// Number of stored properties, reviewed or not.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.tables.read().properties.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_user_with_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn get_user_with_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn add_user(&self, user: NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write();
        let created = User {
            id: next_id("users", tables.users.iter().map(|u| u.id))?,
            name: user.name,
            email: user.email,
            password: user.password,
        };
        tables.users.push(created.clone());

        debug!(user_id = created.id, "Inserted user");
        Ok(created)
    }

    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32,
    ) -> RepositoryResult<Vec<GuestReservation>> {
        let tables = self.tables.read();

        let mut rows: Vec<GuestReservation> = tables
            .reservations
            .iter()
            .filter(|reservation| reservation.guest_id == guest_id)
            .filter_map(|reservation| {
                let property = tables.property(reservation.property_id)?;
                let average_rating = tables.average_rating(property.id)?;
                Some(GuestReservation {
                    property: property.clone(),
                    reservation_id: reservation.id,
                    start_date: reservation.start_date,
                    end_date: reservation.end_date,
                    guest_id: reservation.guest_id,
                    average_rating: Some(average_rating),
                })
            })
            .collect();

        rows.sort_by_key(|row| (row.start_date, row.reservation_id));
        rows.truncate(limit as usize);

        debug!(guest_id, rows = rows.len(), "Fetched guest reservations");
        Ok(rows)
    }

    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: u32,
    ) -> RepositoryResult<Vec<PropertyListing>> {
        let filters = search.filters();
        let tables = self.tables.read();

        let mut rows: Vec<PropertyListing> = tables
            .properties
            .iter()
            .filter(|property| filters.iter().all(|filter| filter.matches(property)))
            .filter_map(|property| {
                let average_rating = tables.average_rating(property.id);
                search
                    .accepts_rating(average_rating)
                    .then(|| PropertyListing {
                        property: property.clone(),
                        average_rating,
                    })
            })
            .collect();

        rows.sort_by_key(|row| (row.property.cost_per_night, row.property.id));
        rows.truncate(limit as usize);

        debug!(rows = rows.len(), "Property search complete");
        Ok(rows)
    }

    async fn add_property(&self, property: NewProperty) -> RepositoryResult<Property> {
        let mut tables = self.tables.write();
        if !tables.has_user(property.owner_id) {
            return Err(RepositoryError::NotFound(format!(
                "user {}",
                property.owner_id
            )));
        }

        let id = next_id("properties", tables.properties.iter().map(|p| p.id))?;
        let created = property.into_property(id);
        tables.properties.push(created.clone());

        debug!(property_id = created.id, "Inserted property");
        Ok(created)
    }
}
