//! Unit tests for error module.

use super::*;

// ============================================================================
// Display Tests
// ============================================================================

#[test]
fn test_not_found_display() {
    let error = RepositoryError::NotFound("user 42".to_string());
    assert_eq!(format!("{}", error), "Not found: user 42");
}

#[test]
fn test_database_display() {
    let error = RepositoryError::Database(sqlx::Error::RowNotFound);
    assert!(format!("{}", error).starts_with("Database error: "));
}

#[test]
fn test_migration_display() {
    let error = RepositoryError::Migration(sqlx::migrate::MigrateError::VersionMissing(3));
    assert!(format!("{}", error).starts_with("Migration error: "));
}

#[test]
fn test_id_space_exhausted_display() {
    let error = RepositoryError::IdSpaceExhausted("users".to_string());
    assert_eq!(
        format!("{}", error),
        "Identifier space exhausted for table: users"
    );
    assert_eq!(error.code(), "ID_EXHAUSTED");
}

#[test]
fn test_invalid_fixture_display() {
    let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
    let error = RepositoryError::from(json_err);
    assert!(format!("{}", error).starts_with("Invalid fixture: "));
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_from_sqlx_error() {
    let error: RepositoryError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(error, RepositoryError::Database(sqlx::Error::PoolTimedOut)));
}

#[test]
fn test_question_mark_conversion() {
    fn fails() -> RepositoryResult<()> {
        Err::<(), _>(sqlx::Error::PoolClosed)?;
        Ok(())
    }

    assert!(matches!(fails(), Err(RepositoryError::Database(_))));
}

// ============================================================================
// Code Tests
// ============================================================================

#[test]
fn test_error_codes() {
    assert_eq!(
        RepositoryError::Database(sqlx::Error::RowNotFound).code(),
        "DATABASE_ERROR"
    );
    assert_eq!(
        RepositoryError::Migration(sqlx::migrate::MigrateError::VersionMissing(1)).code(),
        "MIGRATION_ERROR"
    );
    assert_eq!(
        RepositoryError::NotFound("x".to_string()).code(),
        "NOT_FOUND"
    );
    let json_err = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
    assert_eq!(RepositoryError::from(json_err).code(), "INVALID_FIXTURE");
}
