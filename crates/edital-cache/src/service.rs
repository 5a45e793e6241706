//! Two-tier cache service.
//!
//! ## Architecture
//!
//! ```text
//! get(key) → memory tier (DashMap) → persistent tier (Postgres) → caller recomputes
//!                 ↓                         ↓
//!             <1µs latency             ~ms latency (promoted to memory on hit)
//! ```
//!
//! The service hides the tier topology from callers: reads check memory
//! first, fall back to the persistent tier and promote live hits; writes land
//! in memory synchronously and are flushed to the persistent tier
//! asynchronously (fire-and-forget).
//!
//! ## Graceful Degradation
//!
//! Reads never fail: any persistent-tier error is logged and degrades to a
//! miss, so a misconfigured or unmigrated cache table slows responses down
//! instead of breaking them. The only error a write propagates is a value
//! that cannot be serialized, which is a caller bug rather than an
//! environmental problem.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::entry::{Dependency, SetOptions};
use crate::error::{CacheError, Result};
use crate::memory::{MemoryEntry, MemoryTier};
use crate::tier::{PersistedEntry, PersistentStats, PersistentTier};
use crate::ttl::TtlPolicy;

/// Default interval between housekeeping sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the cache service.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How often the background sweep removes expired entries.
    pub sweep_interval: Duration,
    /// Prefix-based TTL defaults for writes without an explicit TTL.
    pub ttl_policy: TtlPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            ttl_policy: TtlPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval.
    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the TTL policy.
    #[must_use]
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }
}

/// Which tier served a cache hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// Served from the process-local memory tier.
    Memory,
    /// Served from the persistent tier (and promoted into memory).
    Persistent,
}

/// Outcome of a cache read, before deserialization.
///
/// `Degraded` is distinct from `Miss` so observability can tell "key not
/// present" apart from "tier unreachable", even though callers see both as
/// an absent value.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// A live value was found.
    Hit {
        /// The cached JSON value.
        value: Arc<Value>,
        /// Which tier served it.
        tier: TierKind,
    },
    /// No live value exists in either tier.
    Miss,
    /// The persistent tier errored; treated as a miss by callers.
    Degraded,
}

/// Point-in-time cache statistics. Introspection only, no side effects.
#[derive(Debug, Clone, Default)]
pub struct CacheStatistics {
    /// Entries physically present in the memory tier (expired or not).
    pub memory_entries: usize,
    /// Memory entries whose TTL has passed but have not been swept yet.
    pub memory_expired: usize,
    /// Memory-tier hits since the service was created.
    pub hits: u64,
    /// Memory-tier misses since the service was created.
    pub misses: u64,
    /// Expired memory entries physically removed so far.
    pub evictions: u64,
    /// Persistent-tier row counts; `None` when the tier was unreachable.
    pub persistent: Option<PersistentStats>,
    /// Timestamp of the most recent cache operation.
    pub last_access: Option<DateTime<Utc>>,
}

impl CacheStatistics {
    /// Memory-tier hit rate as a percentage.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct Inner {
    memory: MemoryTier,
    persistent: Arc<dyn PersistentTier>,
    config: CacheConfig,
    /// Unix millis of the most recent operation; 0 means never.
    last_access: AtomicI64,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Abort the sweep task when the last service handle goes away, so
        // tests and graceful shutdown never leak a timer.
        if let Some(handle) = lock_sweeper(&self.sweeper).take() {
            handle.abort();
        }
    }
}

fn lock_sweeper(sweeper: &Mutex<Option<JoinHandle<()>>>) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    match sweeper.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Single entry point for all cache reads and writes.
///
/// Cloning is cheap and shares all state, including the sweep task.
#[derive(Clone)]
pub struct CacheService {
    inner: Arc<Inner>,
}

impl CacheService {
    /// Creates a service over the given persistent tier.
    #[must_use]
    pub fn new(persistent: Arc<dyn PersistentTier>, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                memory: MemoryTier::new(),
                persistent,
                config,
                last_access: AtomicI64::new(0),
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Creates a service over the given persistent tier with default config.
    #[must_use]
    pub fn with_defaults(persistent: Arc<dyn PersistentTier>) -> Self {
        Self::new(persistent, CacheConfig::default())
    }

    /// Creates a memory-only service (no-op persistent tier).
    #[must_use]
    pub fn memory_only() -> Self {
        Self::with_defaults(Arc::new(crate::tier::NoopTier))
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Direct access to the memory tier (for tests and diagnostics).
    #[must_use]
    pub fn memory(&self) -> &MemoryTier {
        &self.inner.memory
    }

    /// Reads a value, checking memory first and falling back to the
    /// persistent tier.
    ///
    /// Returns `None` on a miss, on a degraded (tier-unreachable) read, and
    /// when the stored value no longer deserializes as `T` — a read never
    /// fails.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.lookup(key).await {
            Lookup::Hit { value, .. } => match serde_json::from_value(value.as_ref().clone()) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Cached value no longer deserializes, dropping it");
                    self.inner.memory.remove(key);
                    None
                }
            },
            Lookup::Miss | Lookup::Degraded => None,
        }
    }

    /// Reads a raw value, reporting which tier served it.
    ///
    /// This is the untyped read path behind [`get`](Self::get); it exists so
    /// callers that care about observability can distinguish a genuine miss
    /// from a degraded read.
    pub async fn lookup(&self, key: &str) -> Lookup {
        self.touch();

        if let Some(value) = self.inner.memory.get(key) {
            tracing::debug!(key = %key, "cache hit (memory)");
            return Lookup::Hit {
                value,
                tier: TierKind::Memory,
            };
        }

        match self.inner.persistent.get(key).await {
            Ok(Some(entry)) => {
                let Some(remaining) = remaining_ttl(entry.expires_at) else {
                    // The tier contract says only live rows come back, but
                    // the row may have expired during the round trip.
                    tracing::debug!(key = %key, "cache miss");
                    return Lookup::Miss;
                };

                let promoted = MemoryEntry::new(entry.value, remaining, entry.dependencies);
                let value = Arc::clone(&promoted.value);
                self.inner.memory.insert(key.to_string(), promoted);

                tracing::debug!(key = %key, "cache hit (persistent), promoted to memory");
                Lookup::Hit {
                    value,
                    tier: TierKind::Persistent,
                }
            }
            Ok(None) => {
                tracing::debug!(key = %key, "cache miss");
                Lookup::Miss
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Persistent tier read failed, degrading to miss");
                Lookup::Degraded
            }
        }
    }

    /// Writes a value to both tiers.
    ///
    /// The memory write is synchronous; the persistent write is
    /// fire-and-forget with the same expiry and dependency tags, so the two
    /// tiers are eventually (not strictly) consistent. A persistent-tier
    /// failure is logged as a degraded write and never reaches the caller.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Serialization` if the value cannot be encoded as
    /// JSON.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: SetOptions) -> Result<()> {
        self.touch();

        let json = serde_json::to_value(value)?;
        let ttl = options
            .ttl
            .unwrap_or_else(|| self.inner.config.ttl_policy.ttl_for(key));
        let expires_at = expiry_from_ttl(ttl);
        let dependencies = options.dependencies;

        self.inner
            .memory
            .insert(key.to_string(), MemoryEntry::new(json.clone(), ttl, dependencies.clone()));

        let persistent = Arc::clone(&self.inner.persistent);
        let entry = PersistedEntry {
            key: key.to_string(),
            value: json,
            expires_at,
            dependencies,
        };
        tokio::spawn(async move {
            let key = entry.key.clone();
            match persistent.put(entry).await {
                Ok(()) => tracing::debug!(key = %key, "cache set (memory + persistent)"),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Degraded write: persistent tier put failed");
                }
            }
        });

        Ok(())
    }

    /// Reads a value, computing and caching it on a miss.
    ///
    /// No single-flight: concurrent callers missing on the same key each run
    /// `compute` independently, last write wins.
    ///
    /// # Errors
    ///
    /// Propagates `compute`'s error, or a serialization failure from the
    /// implicit `set`.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        options: SetOptions,
        compute: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = compute().await?;
        self.set(key, &value, options).await.map_err(E::from)?;
        Ok(value)
    }

    /// Removes a key from both tiers. Idempotent.
    pub async fn delete(&self, key: &str) {
        self.touch();
        self.inner.memory.remove(key);

        if let Err(e) = self.inner.persistent.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Persistent tier delete failed");
        }
    }

    /// Removes every key starting with `prefix`, from both tiers.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidPattern` for an empty or blank prefix,
    /// before touching any tier.
    pub async fn clear_by_prefix(&self, prefix: &str) -> Result<()> {
        if prefix.trim().is_empty() {
            return Err(CacheError::invalid_pattern("prefix must not be empty"));
        }
        self.touch();

        let removed = self.inner.memory.remove_by_prefix(prefix);
        match self.inner.persistent.delete_by_prefix(prefix).await {
            Ok(n) => {
                tracing::debug!(prefix = %prefix, memory = removed, persistent = n, "cache cleared by prefix");
            }
            Err(e) => {
                tracing::warn!(prefix = %prefix, error = %e, "Persistent tier prefix clear failed");
            }
        }
        Ok(())
    }

    /// Removes every key containing `fragment`, from both tiers.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidPattern` for an empty or blank fragment,
    /// before touching any tier.
    pub async fn clear_by_pattern(&self, fragment: &str) -> Result<()> {
        if fragment.trim().is_empty() {
            return Err(CacheError::invalid_pattern("pattern must not be empty"));
        }
        self.touch();

        let removed = self.inner.memory.remove_by_pattern(fragment);
        match self.inner.persistent.delete_by_pattern(fragment).await {
            Ok(n) => {
                tracing::debug!(pattern = %fragment, memory = removed, persistent = n, "cache cleared by pattern");
            }
            Err(e) => {
                tracing::warn!(pattern = %fragment, error = %e, "Persistent tier pattern clear failed");
            }
        }
        Ok(())
    }

    /// Removes every entry tagged with `dependency`, from both tiers.
    ///
    /// A single "usuario 42 changed" event purges every cached aggregate
    /// derived from that user's data, however many distinct keys exist.
    pub async fn invalidate(&self, dependency: &Dependency) {
        self.touch();

        let removed = self.inner.memory.remove_by_dependency(dependency);
        match self.inner.persistent.delete_by_dependency(dependency).await {
            Ok(n) => {
                tracing::debug!(dependency = %dependency, memory = removed, persistent = n, "cache invalidated by dependency");
            }
            Err(e) => {
                tracing::warn!(dependency = %dependency, error = %e, "Persistent tier dependency invalidation failed");
            }
        }
    }

    /// Reports current statistics from both tiers.
    ///
    /// The persistent counts are `None` when that tier is unreachable.
    pub async fn statistics(&self) -> CacheStatistics {
        let persistent = match self.inner.persistent.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Persistent tier stats unavailable");
                None
            }
        };

        let last_access_ms = self.inner.last_access.load(Ordering::Relaxed);
        CacheStatistics {
            memory_entries: self.inner.memory.len(),
            memory_expired: self.inner.memory.expired_count(),
            hits: self.inner.memory.hits(),
            misses: self.inner.memory.misses(),
            evictions: self.inner.memory.evictions(),
            persistent,
            last_access: (last_access_ms != 0)
                .then(|| DateTime::from_timestamp_millis(last_access_ms))
                .flatten(),
        }
    }

    /// Starts the periodic housekeeping sweep. Idempotent.
    ///
    /// The sweep physically removes expired memory entries and bulk-deletes
    /// expired rows from the persistent tier on every tick.
    pub fn start_sweep(&self) {
        let mut guard = lock_sweeper(&self.inner.sweeper);
        if guard.is_some() {
            return;
        }

        // The task holds a weak reference so that dropping the last service
        // handle tears the sweep down instead of keeping the cache alive.
        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.config.sweep_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; skip it so the sweep
            // starts one full interval after start_sweep().
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };

                let memory_removed = inner.memory.remove_expired();
                match inner.persistent.delete_expired().await {
                    Ok(persistent_removed) => {
                        tracing::debug!(
                            memory_removed,
                            persistent_removed,
                            "cache sweep completed"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            memory_removed,
                            error = %e,
                            "cache sweep could not reach persistent tier"
                        );
                    }
                }
            }
        });

        *guard = Some(handle);
        tracing::debug!(interval_secs = interval.as_secs(), "cache sweep started");
    }

    /// Stops the periodic sweep. Idempotent.
    pub fn stop_sweep(&self) {
        if let Some(handle) = lock_sweeper(&self.inner.sweeper).take() {
            handle.abort();
            tracing::debug!("cache sweep stopped");
        }
    }

    /// Returns `true` while the sweep task is scheduled.
    #[must_use]
    pub fn sweep_running(&self) -> bool {
        lock_sweeper(&self.inner.sweeper).is_some()
    }

    fn touch(&self) {
        self.inner
            .last_access
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

/// Computes an absolute expiry timestamp, saturating on overflow.
fn expiry_from_ttl(ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Remaining lifetime of a persisted entry, or `None` if already expired.
fn remaining_ttl(expires_at: DateTime<Utc>) -> Option<Duration> {
    let remaining = expires_at - Utc::now();
    if remaining <= TimeDelta::zero() {
        return None;
    }
    remaining.to_std().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get_memory_only() {
        let cache = CacheService::memory_only();

        cache
            .set("dashboard:1", &json!({"acertos": 10}), SetOptions::new())
            .await
            .unwrap();

        let value: Option<Value> = cache.get("dashboard:1").await;
        assert_eq!(value, Some(json!({"acertos": 10})));
    }

    #[tokio::test]
    async fn test_get_typed_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Progresso {
            usuario_id: String,
            questoes_resolvidas: u32,
        }

        let cache = CacheService::memory_only();
        let progresso = Progresso {
            usuario_id: "42".into(),
            questoes_resolvidas: 120,
        };

        cache
            .set("progresso_usuario:42", &progresso, SetOptions::new())
            .await
            .unwrap();

        let back: Progresso = cache.get("progresso_usuario:42").await.unwrap();
        assert_eq!(back, progresso);
    }

    #[tokio::test]
    async fn test_get_wrong_shape_is_a_miss() {
        let cache = CacheService::memory_only();
        cache
            .set("k", &json!("just a string"), SetOptions::new())
            .await
            .unwrap();

        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Structured {
            field: u32,
        }

        let miss: Option<Structured> = cache.get("k").await;
        assert!(miss.is_none());
        // The undecodable entry was dropped.
        assert_eq!(cache.memory().len(), 0);
    }

    #[tokio::test]
    async fn test_ttl_policy_applies_without_explicit_ttl() {
        let cache = CacheService::memory_only();
        cache
            .set("dashboard:1", &json!(1), SetOptions::new())
            .await
            .unwrap();

        // Policy TTL for dashboard keys is 2 minutes, so the value is live.
        assert!(cache.get::<Value>("dashboard:1").await.is_some());
    }

    #[tokio::test]
    async fn test_explicit_ttl_overrides_policy() {
        let cache = CacheService::memory_only();
        cache
            .set(
                "dashboard:1",
                &json!(1),
                SetOptions::new().with_ttl(Duration::ZERO),
            )
            .await
            .unwrap();

        assert!(cache.get::<Value>("dashboard:1").await.is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_saturates_instead_of_failing() {
        let cache = CacheService::memory_only();
        cache
            .set("k", &json!(1), SetOptions::new().with_ttl(Duration::MAX))
            .await
            .unwrap();

        assert!(cache.get::<Value>("k").await.is_some());
    }

    #[tokio::test]
    async fn test_get_or_set_computes_once() {
        let cache = CacheService::memory_only();
        let mut calls = 0u32;

        for _ in 0..2 {
            let value: std::result::Result<Value, CacheError> = cache
                .get_or_set("dashboard:7", SetOptions::new(), || {
                    calls += 1;
                    async { Ok(json!({"total": 3})) }
                })
                .await;
            assert_eq!(value.unwrap(), json!({"total": 3}));
        }

        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = CacheService::memory_only();
        cache.delete("never_existed").await;

        cache.set("k", &json!(1), SetOptions::new()).await.unwrap();
        cache.delete("k").await;
        cache.delete("k").await;
        assert!(cache.get::<Value>("k").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_rejects_blank_input() {
        let cache = CacheService::memory_only();
        assert!(matches!(
            cache.clear_by_prefix("").await,
            Err(CacheError::InvalidPattern { .. })
        ));
        assert!(matches!(
            cache.clear_by_pattern("   ").await,
            Err(CacheError::InvalidPattern { .. })
        ));
    }

    #[tokio::test]
    async fn test_clear_by_prefix_scenario() {
        let cache = CacheService::memory_only();
        cache
            .set("progresso_usuario:1", &json!(1), SetOptions::new())
            .await
            .unwrap();
        cache
            .set("progresso_usuario:2", &json!(2), SetOptions::new())
            .await
            .unwrap();
        cache
            .set("resultado_simulado:1", &json!(3), SetOptions::new())
            .await
            .unwrap();

        cache.clear_by_prefix("progresso_usuario").await.unwrap();

        assert!(cache.get::<Value>("progresso_usuario:1").await.is_none());
        assert!(cache.get::<Value>("progresso_usuario:2").await.is_none());
        assert!(cache.get::<Value>("resultado_simulado:1").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_by_dependency() {
        let cache = CacheService::memory_only();
        let user1 = Dependency::usuario("1");

        for key in ["a", "b", "c"] {
            cache
                .set(
                    key,
                    &json!(key),
                    SetOptions::new().with_dependency(user1.clone()),
                )
                .await
                .unwrap();
        }
        cache
            .set(
                "d",
                &json!("d"),
                SetOptions::new().with_dependency(Dependency::usuario("2")),
            )
            .await
            .unwrap();

        cache.invalidate(&user1).await;

        assert!(cache.get::<Value>("a").await.is_none());
        assert!(cache.get::<Value>("b").await.is_none());
        assert!(cache.get::<Value>("c").await.is_none());
        assert!(cache.get::<Value>("d").await.is_some());
    }

    #[tokio::test]
    async fn test_statistics() {
        let cache = CacheService::memory_only();
        assert!(cache.statistics().await.last_access.is_none());

        cache.set("k", &json!(1), SetOptions::new()).await.unwrap();
        let _: Option<Value> = cache.get("k").await;
        let _: Option<Value> = cache.get("missing").await;

        let stats = cache.statistics().await;
        assert_eq!(stats.memory_entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 50.0).abs() < 0.001);
        assert!(stats.last_access.is_some());
        // NoopTier always reports stats successfully.
        assert_eq!(stats.persistent, Some(PersistentStats::default()));
    }

    #[tokio::test]
    async fn test_sweep_lifecycle() {
        let cache = CacheService::memory_only();
        assert!(!cache.sweep_running());

        cache.start_sweep();
        assert!(cache.sweep_running());
        // Idempotent.
        cache.start_sweep();
        assert!(cache.sweep_running());

        cache.stop_sweep();
        assert!(!cache.sweep_running());
        cache.stop_sweep();
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_memory_entries() {
        let config = CacheConfig::new().with_sweep_interval(Duration::from_millis(20));
        let cache = CacheService::new(Arc::new(crate::tier::NoopTier), config);

        cache
            .set("dead", &json!(1), SetOptions::new().with_ttl(Duration::ZERO))
            .await
            .unwrap();
        cache.set("live", &json!(2), SetOptions::new()).await.unwrap();
        assert_eq!(cache.memory().len(), 2);

        cache.start_sweep();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.memory().len(), 1);
        cache.stop_sweep();
    }

    #[test]
    fn test_expiry_helpers() {
        let ttl = Duration::from_secs(60);
        let expiry = expiry_from_ttl(ttl);
        assert!(expiry > Utc::now());

        let remaining = remaining_ttl(expiry).unwrap();
        assert!(remaining <= ttl);
        assert!(remaining > Duration::from_secs(58));

        assert!(remaining_ttl(Utc::now() - TimeDelta::seconds(1)).is_none());
    }

    #[test]
    fn test_hit_rate_empty() {
        assert!((CacheStatistics::default().hit_rate() - 0.0).abs() < 0.001);
    }
}
