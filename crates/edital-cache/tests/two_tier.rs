//! Integration tests for the two-tier cache service.
//!
//! These tests drive the service against an in-memory fake of the persistent
//! tier, which makes cold starts, tier failures and tier call counts
//! observable without a database. The real Postgres tier is covered by the
//! `edital-cache-postgres` integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use edital_cache::{
    CacheConfig, CacheService, Dependency, Lookup, PersistedEntry, PersistentStats, PersistentTier,
    SetOptions, TierError, TierKind,
};

/// In-memory stand-in for the Postgres tier.
#[derive(Default)]
struct FakeTier {
    rows: Mutex<HashMap<String, PersistedEntry>>,
    get_calls: AtomicU64,
}

impl FakeTier {
    fn insert(&self, entry: PersistedEntry) {
        self.rows.lock().unwrap().insert(entry.key.clone(), entry);
    }

    fn contains(&self, key: &str) -> bool {
        self.rows.lock().unwrap().contains_key(key)
    }

    fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PersistentTier for FakeTier {
    async fn get(&self, key: &str) -> Result<Option<PersistedEntry>, TierError> {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(key).filter(|entry| !entry.is_expired()).cloned())
    }

    async fn put(&self, entry: PersistedEntry) -> Result<(), TierError> {
        self.insert(entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), TierError> {
        self.rows.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, TierError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|key, _| !key.starts_with(prefix));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_pattern(&self, fragment: &str) -> Result<u64, TierError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|key, _| !key.contains(fragment));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_dependency(&self, dependency: &Dependency) -> Result<u64, TierError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, entry| !entry.dependencies.contains(dependency));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_expired(&self) -> Result<u64, TierError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, entry| !entry.is_expired());
        Ok((before - rows.len()) as u64)
    }

    async fn stats(&self) -> Result<PersistentStats, TierError> {
        let rows = self.rows.lock().unwrap();
        let expired = rows.values().filter(|entry| entry.is_expired()).count() as u64;
        Ok(PersistentStats {
            entries: rows.len() as u64,
            expired,
        })
    }
}

/// A persistent tier that fails every call.
struct BrokenTier;

#[async_trait]
impl PersistentTier for BrokenTier {
    async fn get(&self, _key: &str) -> Result<Option<PersistedEntry>, TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn put(&self, _entry: PersistedEntry) -> Result<(), TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn delete(&self, _key: &str) -> Result<(), TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn delete_by_pattern(&self, _fragment: &str) -> Result<u64, TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn delete_by_dependency(&self, _dependency: &Dependency) -> Result<u64, TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn delete_expired(&self) -> Result<u64, TierError> {
        Err(TierError::unavailable("forced failure"))
    }

    async fn stats(&self) -> Result<PersistentStats, TierError> {
        Err(TierError::unavailable("forced failure"))
    }
}

fn persisted(key: &str, value: Value, ttl_secs: i64, deps: Vec<Dependency>) -> PersistedEntry {
    PersistedEntry {
        key: key.to_string(),
        value,
        expires_at: Utc::now() + chrono::TimeDelta::seconds(ttl_secs),
        dependencies: deps,
    }
}

/// Waits for fire-and-forget persistent writes to land.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_write_through_reaches_persistent_tier() {
    let tier = std::sync::Arc::new(FakeTier::default());
    let cache = CacheService::with_defaults(tier.clone());

    cache
        .set(
            "progresso_usuario:42",
            &json!({"acertos": 9}),
            SetOptions::new().with_dependency(Dependency::usuario("42")),
        )
        .await
        .unwrap();
    settle().await;

    assert!(tier.contains("progresso_usuario:42"));
    let row = tier.rows.lock().unwrap()["progresso_usuario:42"].clone();
    assert_eq!(row.dependencies, vec![Dependency::usuario("42")]);
    assert!(row.expires_at > Utc::now());
}

#[tokio::test]
async fn test_promotion_from_persistent_on_cold_start() {
    let tier = std::sync::Arc::new(FakeTier::default());
    // Simulate a restart: the row exists only in the persistent tier.
    tier.insert(persisted("dashboard:42", json!({"total": 5}), 300, vec![]));

    let cache = CacheService::with_defaults(tier.clone());

    match cache.lookup("dashboard:42").await {
        Lookup::Hit { tier, .. } => assert_eq!(tier, TierKind::Persistent),
        other => panic!("expected persistent hit, got {other:?}"),
    }
    assert_eq!(tier.get_calls(), 1);

    // Second read is served from memory without another tier call.
    match cache.lookup("dashboard:42").await {
        Lookup::Hit { tier, .. } => assert_eq!(tier, TierKind::Memory),
        other => panic!("expected memory hit, got {other:?}"),
    }
    assert_eq!(tier.get_calls(), 1);
}

#[tokio::test]
async fn test_promoted_entry_keeps_remaining_ttl() {
    let tier = std::sync::Arc::new(FakeTier::default());
    // Row expires in one second; the promoted copy must not outlive it.
    tier.insert(persisted("k", json!(1), 1, vec![]));

    let cache = CacheService::with_defaults(tier);
    assert!(cache.get::<Value>("k").await.is_some());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(cache.get::<Value>("k").await.is_none());
}

#[tokio::test]
async fn test_promotes_row_with_far_future_expiry() {
    let tier = std::sync::Arc::new(FakeTier::default());
    // A row written while the persistent expiry was saturated.
    tier.insert(PersistedEntry {
        key: "k".to_string(),
        value: json!(1),
        expires_at: chrono::DateTime::<Utc>::MAX_UTC,
        dependencies: Vec::new(),
    });

    let cache = CacheService::with_defaults(tier);
    assert!(cache.get::<Value>("k").await.is_some());
    // The promoted copy is a live memory hit, not an overflow.
    assert!(matches!(
        cache.lookup("k").await,
        Lookup::Hit {
            tier: TierKind::Memory,
            ..
        }
    ));
}

#[tokio::test]
async fn test_expired_persistent_row_is_a_miss() {
    let tier = std::sync::Arc::new(FakeTier::default());
    tier.insert(persisted("k", json!(1), -10, vec![]));

    let cache = CacheService::with_defaults(tier);
    assert!(matches!(cache.lookup("k").await, Lookup::Miss));
}

#[tokio::test]
async fn test_degrades_to_memory_only_when_tier_is_broken() {
    let cache = CacheService::with_defaults(std::sync::Arc::new(BrokenTier));

    // Every operation still succeeds; no error escapes the service.
    cache.set("k", &json!(1), SetOptions::new()).await.unwrap();
    assert_eq!(cache.get::<Value>("k").await, Some(json!(1)));

    cache.delete("k").await;
    assert!(cache.get::<Value>("k").await.is_none());
    assert!(matches!(cache.lookup("k").await, Lookup::Degraded));

    cache.set("p:1", &json!(1), SetOptions::new()).await.unwrap();
    cache.clear_by_prefix("p").await.unwrap();
    cache.clear_by_pattern("x").await.unwrap();
    cache.invalidate(&Dependency::usuario("1")).await;

    let stats = cache.statistics().await;
    assert!(stats.persistent.is_none());
}

#[tokio::test]
async fn test_dependency_invalidation_fans_out_across_tiers() {
    let tier = std::sync::Arc::new(FakeTier::default());
    let cache = CacheService::with_defaults(tier.clone());
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
    settle().await;

    cache.invalidate(&user1).await;

    for key in ["a", "b", "c"] {
        assert!(cache.get::<Value>(key).await.is_none());
        assert!(!tier.contains(key));
    }
    assert!(cache.get::<Value>("d").await.is_some());
    assert!(tier.contains("d"));
}

#[tokio::test]
async fn test_clear_by_prefix_hits_both_tiers() {
    let tier = std::sync::Arc::new(FakeTier::default());
    let cache = CacheService::with_defaults(tier.clone());

    for key in [
        "progresso_usuario:1",
        "progresso_usuario:2",
        "resultado_simulado:1",
    ] {
        cache.set(key, &json!(1), SetOptions::new()).await.unwrap();
    }
    settle().await;

    // A stale copy that only the persistent tier still has.
    tier.insert(persisted("progresso_usuario:3", json!(1), 300, vec![]));

    cache.clear_by_prefix("progresso_usuario").await.unwrap();

    assert!(!tier.contains("progresso_usuario:1"));
    assert!(!tier.contains("progresso_usuario:2"));
    assert!(!tier.contains("progresso_usuario:3"));
    assert!(tier.contains("resultado_simulado:1"));
    assert!(cache.get::<Value>("resultado_simulado:1").await.is_some());
}

#[tokio::test]
async fn test_delete_removes_from_both_tiers() {
    let tier = std::sync::Arc::new(FakeTier::default());
    let cache = CacheService::with_defaults(tier.clone());

    cache.set("k", &json!(1), SetOptions::new()).await.unwrap();
    settle().await;
    assert!(tier.contains("k"));

    cache.delete("k").await;
    assert!(!tier.contains("k"));
    assert!(cache.get::<Value>("k").await.is_none());
}

#[tokio::test]
async fn test_get_or_set_recomputes_after_expiry() {
    let cache = CacheService::with_defaults(std::sync::Arc::new(FakeTier::default()));
    let mut calls = 0u32;

    for _ in 0..2 {
        let _: Value = cache
            .get_or_set(
                "k",
                SetOptions::new().with_ttl(Duration::from_millis(30)),
                || {
                    calls += 1;
                    async { Ok::<_, edital_cache::CacheError>(json!(calls)) }
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
    }

    // Both calls missed (the value expired in between), so both computed.
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_sweep_deletes_expired_rows_in_persistent_tier() {
    let tier = std::sync::Arc::new(FakeTier::default());
    tier.insert(persisted("dead", json!(1), -10, vec![]));
    tier.insert(persisted("live", json!(2), 300, vec![]));

    let config = CacheConfig::new().with_sweep_interval(Duration::from_millis(20));
    let cache = CacheService::new(tier.clone(), config);
    cache.start_sweep();

    tokio::time::sleep(Duration::from_millis(80)).await;
    cache.stop_sweep();

    assert!(!tier.contains("dead"));
    assert!(tier.contains("live"));
}

#[tokio::test]
async fn test_statistics_reflect_persistent_tier() {
    let tier = std::sync::Arc::new(FakeTier::default());
    tier.insert(persisted("dead", json!(1), -10, vec![]));
    tier.insert(persisted("live", json!(2), 300, vec![]));

    let cache = CacheService::with_defaults(tier);
    let stats = cache.statistics().await;

    let persistent = stats.persistent.expect("tier reachable");
    assert_eq!(persistent.entries, 2);
    assert_eq!(persistent.expired, 1);
}
