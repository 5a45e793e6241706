//! `PersistentTier` implementation over a PostgreSQL table.
//!
//! One row per cache key: JSONB value, absolute expiry, and a `text[]` of
//! dependency tags. Reads only see live rows (`expires_at > now()`); expired
//! rows linger until the sweep's `delete_expired` removes them, which is
//! invisible to correctness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use edital_cache::{Dependency, PersistedEntry, PersistentStats, PersistentTier, TierError};

use crate::config::PostgresConfig;
use crate::error::{Result, tier_error};
use crate::pool::create_pool;
use crate::schema::run_migrations;

/// Persistent cache tier backed by the `cache_entries` table.
#[derive(Clone)]
pub struct PostgresTier {
    pool: PgPool,
}

impl PostgresTier {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the given configuration, running the cache migration
    /// when `run_migrations` is set.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = create_pool(config).await?;
        if config.run_migrations {
            run_migrations(&pool).await?;
        }
        Ok(Self::new(pool))
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Verifies the database behind the tier is reachable.
    ///
    /// For host-application health endpoints; the cache service itself never
    /// needs this, it degrades on a per-query basis.
    pub async fn ping(&self) -> Result<()> {
        query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistentTier for PostgresTier {
    async fn get(&self, key: &str) -> std::result::Result<Option<PersistedEntry>, TierError> {
        let row: Option<(Value, DateTime<Utc>, Vec<String>)> = query_as(
            r#"SELECT value, expires_at, dependencies
               FROM cache_entries
               WHERE key = $1 AND expires_at > now()"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| tier_error(e, "Failed to read cache entry"))?;

        Ok(row.map(|(value, expires_at, tags)| PersistedEntry {
            key: key.to_string(),
            value,
            expires_at,
            dependencies: parse_tags(&tags),
        }))
    }

    async fn put(&self, entry: PersistedEntry) -> std::result::Result<(), TierError> {
        let tags: Vec<String> = entry.dependencies.iter().map(Dependency::tag).collect();

        query(
            r#"INSERT INTO cache_entries (key, value, expires_at, updated_at, dependencies)
               VALUES ($1, $2, $3, now(), $4)
               ON CONFLICT (key) DO UPDATE
               SET value = EXCLUDED.value,
                   expires_at = EXCLUDED.expires_at,
                   updated_at = now(),
                   dependencies = EXCLUDED.dependencies"#,
        )
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(entry.expires_at)
        .bind(&tags)
        .execute(&self.pool)
        .await
        .map_err(|e| tier_error(e, "Failed to upsert cache entry"))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> std::result::Result<(), TierError> {
        query("DELETE FROM cache_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| tier_error(e, "Failed to delete cache entry"))?;

        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> std::result::Result<u64, TierError> {
        let result = query("DELETE FROM cache_entries WHERE key LIKE $1 ESCAPE '\\'")
            .bind(format!("{}%", escape_like(prefix)))
            .execute(&self.pool)
            .await
            .map_err(|e| tier_error(e, "Failed to delete cache entries by prefix"))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_pattern(&self, fragment: &str) -> std::result::Result<u64, TierError> {
        let result = query("DELETE FROM cache_entries WHERE key LIKE $1 ESCAPE '\\'")
            .bind(format!("%{}%", escape_like(fragment)))
            .execute(&self.pool)
            .await
            .map_err(|e| tier_error(e, "Failed to delete cache entries by pattern"))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_dependency(
        &self,
        dependency: &Dependency,
    ) -> std::result::Result<u64, TierError> {
        // `@>` on text[] uses the GIN index on `dependencies`.
        let result = query("DELETE FROM cache_entries WHERE dependencies @> $1")
            .bind(vec![dependency.tag()])
            .execute(&self.pool)
            .await
            .map_err(|e| tier_error(e, "Failed to delete cache entries by dependency"))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self) -> std::result::Result<u64, TierError> {
        let result = query("DELETE FROM cache_entries WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(|e| tier_error(e, "Failed to delete expired cache entries"))?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> std::result::Result<PersistentStats, TierError> {
        let (entries, expired): (i64, i64) = query_as(
            r#"SELECT count(*),
                      count(*) FILTER (WHERE expires_at <= now())
               FROM cache_entries"#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tier_error(e, "Failed to read cache stats"))?;

        Ok(PersistentStats {
            entries: entries as u64,
            expired: expired as u64,
        })
    }
}

/// Decodes stored tags, skipping anything unrecognized.
///
/// Unknown tags can appear after a rollback to an older dependency-kind set;
/// dropping them only weakens invalidation for those rows, it never breaks
/// reads.
fn parse_tags(tags: &[String]) -> Vec<Dependency> {
    tags.iter()
        .filter_map(|tag| Dependency::parse_tag(tag))
        .collect()
}

/// Escapes `LIKE` wildcards in caller-supplied key fragments.
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
