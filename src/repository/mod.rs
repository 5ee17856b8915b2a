//! Repository interface and its storage backends.
//!
//! | Backend | Storage |
//! |---------|---------|
//! | [`PgRepository`] | PostgreSQL through a [`DatabasePool`](crate::db::DatabasePool) |
//! | [`MemoryRepository`] | Process-local tables, for tests and fixtures |
//!
//! Callers hold an `Arc<dyn Repository>` and never depend on the backend.

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::db::{GuestReservation, NewProperty, NewUser, Property, PropertyListing, User};
use crate::error::RepositoryResult;
use crate::search::PropertySearch;
use async_trait::async_trait;

/// Data-access operations of the listing application.
///
/// Each operation performs one statement against the backing store.
/// `Ok(None)` and `Ok(vec![])` mean nothing matched; `Err` means the store
/// could not answer.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Finds the user registered under `email`.
    async fn get_user_with_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Finds the user with identifier `id`.
    async fn get_user_with_id(&self, id: i32) -> RepositoryResult<Option<User>>;

    /// Registers a user and returns the stored record.
    async fn add_user(&self, user: NewUser) -> RepositoryResult<User>;

    /// Lists up to `limit` reservations made by `guest_id`, each joined with
    /// the reserved property and its average rating, earliest stay first.
    ///
    /// Reservations of properties without any review are not returned.
    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32,
    ) -> RepositoryResult<Vec<GuestReservation>>;

    /// Searches reviewed properties, cheapest first, returning at most `limit`.
    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: u32,
    ) -> RepositoryResult<Vec<PropertyListing>>;

    /// Lists a property and returns the stored record.
    async fn add_property(&self, property: NewProperty) -> RepositoryResult<Property>;
}
