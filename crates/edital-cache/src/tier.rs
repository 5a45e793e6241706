//! Persistent tier abstraction.
//!
//! The persistent tier is the durable, cross-process store the memory tier
//! falls back to: it survives restarts and is shared by every instance of the
//! backend. Implementations live in separate crates (see
//! `edital-cache-postgres`); this module only defines the trait they
//! implement plus a no-op implementation for memory-only deployments.
//!
//! All failures surface as [`TierError`] and are absorbed at the
//! cache-service boundary — a broken or missing persistent tier degrades the
//! system to memory-only behavior, it never breaks callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entry::Dependency;
use crate::error::TierError;

/// An entry as stored in (or read from) the persistent tier.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedEntry {
    /// The cache key.
    pub key: String,
    /// The cached JSON value.
    pub value: Value,
    /// Absolute expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Dependency tags recorded with the write.
    pub dependencies: Vec<Dependency>,
}

impl PersistedEntry {
    /// Returns `true` if this entry's expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Row counts reported by a persistent tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistentStats {
    /// Total rows physically present.
    pub entries: u64,
    /// Rows whose expiry has already passed but have not been swept yet.
    pub expired: u64,
}

/// Durable key/value store backing the cache across processes and restarts.
///
/// ## Contract
///
/// - `get` must only return live rows (`expires_at` in the future); an
///   expired row is a miss.
/// - `put` is an upsert: a key maps to at most one row, last write wins.
/// - Every delete variant is idempotent and returns the number of rows
///   actually removed (where the backend can report it).
#[async_trait]
pub trait PersistentTier: Send + Sync {
    /// Fetches a live entry by key.
    async fn get(&self, key: &str) -> Result<Option<PersistedEntry>, TierError>;

    /// Inserts or replaces an entry.
    async fn put(&self, entry: PersistedEntry) -> Result<(), TierError>;

    /// Deletes an entry by key. Idempotent.
    async fn delete(&self, key: &str) -> Result<(), TierError>;

    /// Deletes every entry whose key starts with `prefix`.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, TierError>;

    /// Deletes every entry whose key contains `fragment`.
    async fn delete_by_pattern(&self, fragment: &str) -> Result<u64, TierError>;

    /// Deletes every entry tagged with the given dependency.
    async fn delete_by_dependency(&self, dependency: &Dependency) -> Result<u64, TierError>;

    /// Bulk-deletes rows whose expiry has passed. Called by the sweep.
    async fn delete_expired(&self) -> Result<u64, TierError>;

    /// Reports row counts for statistics endpoints.
    async fn stats(&self) -> Result<PersistentStats, TierError>;
}

/// A persistent tier that stores nothing.
///
/// Used for memory-only deployments and tests; every read is a miss and
/// every write or delete is a successful no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTier;

#[async_trait]
impl PersistentTier for NoopTier {
    async fn get(&self, _key: &str) -> Result<Option<PersistedEntry>, TierError> {
        Ok(None)
    }

    async fn put(&self, _entry: PersistedEntry) -> Result<(), TierError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), TierError> {
        Ok(())
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, TierError> {
        Ok(0)
    }

    async fn delete_by_pattern(&self, _fragment: &str) -> Result<u64, TierError> {
        Ok(0)
    }

    async fn delete_by_dependency(&self, _dependency: &Dependency) -> Result<u64, TierError> {
        Ok(0)
    }

    async fn delete_expired(&self) -> Result<u64, TierError> {
        Ok(0)
    }

    async fn stats(&self) -> Result<PersistentStats, TierError> {
        Ok(PersistentStats::default())
    }
}
