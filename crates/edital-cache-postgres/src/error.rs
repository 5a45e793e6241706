//! Error types for the PostgreSQL cache tier.

use edital_cache::TierError;
use sqlx_core::error::Error as SqlxError;

/// PostgreSQL error code for undefined table (42P01).
pub const PG_UNDEFINED_TABLE: &str = "42P01";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is "undefined table" (42P01).
///
/// This happens on a fresh deploy before the cache migration has run; the
/// cache service degrades to memory-only behavior in that case.
pub fn is_undefined_table(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNDEFINED_TABLE)
}

/// Errors specific to the PostgreSQL cache tier.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx_core::error::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new migration error.
    #[must_use]
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }
}

impl From<PostgresError> for TierError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => TierError::unavailable(e.to_string()),
            PostgresError::Migration(e) => TierError::query(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                TierError::unavailable(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Maps a sqlx query error to the tier error the cache service degrades on.
///
/// An undefined table or a connection-level failure means the tier is
/// unavailable; anything else is a query failure.
pub fn tier_error(err: SqlxError, context: &str) -> TierError {
    if is_undefined_table(&err) {
        return TierError::unavailable(format!("cache table not migrated: {err}"));
    }
    match err {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
            TierError::unavailable(format!("{context}: {err}"))
        }
        other => TierError::query(format!("{context}: {other}")),
    }
}

/// Result type alias for PostgreSQL tier operations.
pub type Result<T> = std::result::Result<T, PostgresError>;
