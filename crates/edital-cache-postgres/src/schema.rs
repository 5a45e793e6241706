//! Schema management for the cache table.
//!
//! The cache owns a single table plus two indexes. The migration is
//! idempotent (`IF NOT EXISTS` everywhere) so it can run on every startup.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// The table holding persisted cache entries.
pub const CACHE_TABLE: &str = "cache_entries";

/// Idempotent DDL for the cache table and its indexes.
///
/// - `key` is the cache key, one live row per key (upserts replace).
/// - `value` holds the serialized payload as JSONB.
/// - `expires_at` drives TTL checks and the sweep's bulk delete.
/// - `dependencies` holds `"<kind>:<id>"` tags; the GIN index makes the
///   tag-match delete used by dependency invalidation cheap.
const MIGRATION_SQL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS cache_entries (
        key          TEXT PRIMARY KEY,
        value        JSONB NOT NULL,
        expires_at   TIMESTAMPTZ NOT NULL,
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        dependencies TEXT[] NOT NULL DEFAULT '{}'
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_cache_entries_expires_at
        ON cache_entries (expires_at)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_cache_entries_dependencies
        ON cache_entries USING GIN (dependencies)"#,
];

/// Creates the cache table and indexes if they do not exist yet.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for statement in MIGRATION_SQL {
        query(statement)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::migration(format!("Failed to apply cache DDL: {e}")))?;
    }

    info!(table = CACHE_TABLE, "Cache schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_statements_are_idempotent() {
        for statement in MIGRATION_SQL {
            assert!(statement.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_migration_defines_expected_columns() {
        let ddl = MIGRATION_SQL[0];
        for column in ["key", "value", "expires_at", "updated_at", "dependencies"] {
            assert!(ddl.contains(column), "missing column: {column}");
        }
    }
}
