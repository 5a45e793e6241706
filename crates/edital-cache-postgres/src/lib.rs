//! PostgreSQL persistent tier for the Edital cache.
//!
//! Implements [`edital_cache::PersistentTier`] over a single `cache_entries`
//! table (JSONB value, absolute expiry, `text[]` dependency tags), accessed
//! through sqlx. A missing table or unreachable database maps to
//! `TierError::Unavailable`, which the cache service degrades on — cache
//! misconfiguration never becomes a user-facing outage.

pub mod config;
pub mod error;
pub mod pool;
pub mod schema;
pub mod tier;

pub use config::PostgresConfig;
pub use error::{PostgresError, is_undefined_table};
pub use pool::create_pool;
pub use schema::run_migrations;
pub use tier::PostgresTier;
