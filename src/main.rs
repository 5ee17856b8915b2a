//! LightBnB store tool
//!
//! Connects to the configured PostgreSQL store, applies the schema migrations
//! and reports what the listing tables hold.

use lightbnb::config::Config;
use lightbnb::db::DatabasePool;
use lightbnb::repository::{PgRepository, Repository};
use lightbnb::search::PropertySearch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Connecting to {}:{}/{} as {}",
        config.database.host, config.database.port, config.database.database, config.database.user
    );

    let db = DatabasePool::connect(&config.database).await?;
    db.run_migrations().await?;

    let (users, properties, reservations): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT count(*) FROM users),
            (SELECT count(*) FROM properties),
            (SELECT count(*) FROM reservations)
        "#,
    )
    .fetch_one(db.pool())
    .await?;
    info!(
        "Store holds {} users, {} properties, {} reservations",
        users, properties, reservations
    );

    let repo = PgRepository::new(db.clone());
    let listings = repo
        .get_all_properties(&PropertySearch::new(), config.search.default_limit)
        .await?;
    info!("{} reviewed properties in the cheapest page", listings.len());

    db.close().await;
    Ok(())
}
