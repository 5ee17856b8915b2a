//! # LightBnB - Listing Data Access
//!
//! Data-access layer for a vacation rental listing application. Users,
//! properties, reservations and reviews live in PostgreSQL and are reached
//! through [sqlx](https://crates.io/crates/sqlx).
//!
//! ## Key Features
//!
//! - **Typed rows**: every statement maps into a plain record from [`db`].
//!
//! - **Filter search**: property searches are assembled from an ordered list
//!   of predicates with bound parameters, never from caller text.
//!
//! - **Explicit failures**: operations return [`RepositoryResult`]; an empty
//!   result means nothing matched, an error means the store failed.
//!
//! - **Swappable storage**: the [`Repository`] trait has a PostgreSQL backend
//!   and an in-memory backend with the same semantics.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML configuration for the store connection and search defaults |
//! | [`db`] | Connection pool and row types |
//! | [`error`] | Repository error type |
//! | [`repository`] | The `Repository` trait and its backends |
//! | [`search`] | Property search options and statement construction |
//!
//! ## Operations
//!
//! | Operation | Returns |
//! |-----------|---------|
//! | `get_user_with_email` | `Option<User>` |
//! | `get_user_with_id` | `Option<User>` |
//! | `add_user` | created `User` |
//! | `get_all_reservations` | `Vec<GuestReservation>` |
//! | `get_all_properties` | `Vec<PropertyListing>` |
//! | `add_property` | created `Property` |
//!
//! ## Example Usage
//!
//! ```no_run
//! use lightbnb::config::Config;
//! use lightbnb::db::DatabasePool;
//! use lightbnb::repository::{PgRepository, Repository};
//! use lightbnb::search::PropertySearch;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let db = DatabasePool::connect(&config.database).await?;
//! let repo = PgRepository::new(db);
//!
//! let search = PropertySearch::new()
//!     .city("Vancouver")
//!     .maximum_price_per_night(150);
//! let listings = repo
//!     .get_all_properties(&search, config.search.default_limit)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod repository;
pub mod search;

pub use error::{RepositoryError, RepositoryResult};
pub use repository::Repository;

/// Row cap for searches and reservation listings when none is given.
pub const DEFAULT_LIMIT: u32 = 10;
