//! Custom error types for the common library
//!
//! This module defines the error types raised by database bootstrap code and
//! by the user/task repositories.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors returned by the user and task repositories
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate username or email)
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A task referenced an owner that does not exist
    #[error("Owner does not exist")]
    MissingOwner,

    /// A stored value could not be mapped back into a model
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The underlying database failed
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            SqlxError::Database(db) if db.is_foreign_key_violation() => StoreError::MissingOwner,
            _ => StoreError::Database(DatabaseError::Query(err)),
        }
    }
}

/// Type alias for repository results
pub type StoreResult<T> = Result<T, StoreError>;
