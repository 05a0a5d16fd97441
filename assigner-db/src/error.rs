//! Error types for database operations

use assigner_core::{Entity, StoreError};
use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum Error {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row holds a value the domain model does not accept
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Classify an insert failure: unique violations become `AlreadyExists`.
pub(crate) fn insert_error(err: sqlx::Error, entity: Entity) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::AlreadyExists(entity),
        _ => Error::Sqlx(err).into(),
    }
}

/// Classify a lookup failure: missing rows become `NotFound`.
pub(crate) fn lookup_error(err: sqlx::Error, entity: Entity) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(entity),
        e => Error::Sqlx(e).into(),
    }
}
