//! Error types for the data-access layer.

#[cfg(test)]
mod tests;

/// Errors returned by repository operations.
///
/// An operation that matched nothing returns `Ok` with an empty result;
/// `Err` always means the operation itself failed.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Query or connection failure reported by the store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the embedded schema migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No identifier is left above the table's current maximum.
    #[error("Identifier space exhausted for table: {0}")]
    IdSpaceExhausted(String),

    /// Fixture data could not be decoded.
    #[error("Invalid fixture: {0}")]
    InvalidFixture(#[from] serde_json::Error),
}

impl RepositoryError {
    /// Stable machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::Database(_) => "DATABASE_ERROR",
            RepositoryError::Migration(_) => "MIGRATION_ERROR",
            RepositoryError::NotFound(_) => "NOT_FOUND",
            RepositoryError::IdSpaceExhausted(_) => "ID_EXHAUSTED",
            RepositoryError::InvalidFixture(_) => "INVALID_FIXTURE",
        }
    }
}

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
