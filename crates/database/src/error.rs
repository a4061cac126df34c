//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record owned by a different user
    #[error("{entity} {id} belongs to another user")]
    Forbidden { entity: &'static str, id: String },

    /// Monthly subscription limit reached
    #[error("{resource} limit reached ({limit} per month)")]
    QuotaExceeded { resource: &'static str, limit: i64 },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
