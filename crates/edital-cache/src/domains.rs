//! Per-feature cache facades.
//!
//! Thin wrappers that fix the key shape, the default TTL and the dependency
//! tags for one domain concept, so call sites across the backend cannot
//! drift into inconsistent key construction or TTL choices. No new
//! algorithms live here; everything delegates to [`CacheService`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::entry::{Dependency, SetOptions};
use crate::error::{CacheError, Result};
use crate::key::{cache_key, cache_key_with_params};
use crate::service::CacheService;
use crate::ttl::{DASHBOARD_TTL, EXAM_RESULT_TTL, USER_PROGRESS_TTL, WEEKLY_QUESTIONS_TTL};

/// Caches a user's aggregated study progress.
///
/// Keys: `progresso_usuario:{usuario_id}`, tagged with the `usuario`
/// dependency so any change to the user's activity purges the aggregate.
#[derive(Clone)]
pub struct UserProgressCache {
    cache: CacheService,
}

impl UserProgressCache {
    const NAMESPACE: &'static str = "progresso_usuario";

    /// Wraps the given cache service.
    #[must_use]
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Reads the cached progress aggregate for a user.
    pub async fn get<T: DeserializeOwned>(&self, usuario_id: &str) -> Option<T> {
        let key = read_key(cache_key(Self::NAMESPACE, usuario_id))?;
        self.cache.get(&key).await
    }

    /// Caches the progress aggregate for a user.
    pub async fn set<T: Serialize>(&self, usuario_id: &str, value: &T) -> Result<()> {
        let key = cache_key(Self::NAMESPACE, usuario_id)?;
        let options = SetOptions::new()
            .with_ttl(USER_PROGRESS_TTL)
            .with_dependency(Dependency::usuario(usuario_id));
        self.cache.set(&key, value, options).await
    }

    /// Purges everything cached for this user, across all namespaces.
    pub async fn invalidate(&self, usuario_id: &str) {
        self.cache.invalidate(&Dependency::usuario(usuario_id)).await;
    }
}

/// Caches graded practice-exam (simulado) results.
///
/// Keys: `resultado_simulado:{simulado_id}:{usuario_id}`, tagged with both
/// the `simulado` and the `usuario` dependency: regrading a simulado purges
/// every user's cached result, and a user-level invalidation purges theirs.
#[derive(Clone)]
pub struct ExamResultCache {
    cache: CacheService,
}

impl ExamResultCache {
    const NAMESPACE: &'static str = "resultado_simulado";

    /// Wraps the given cache service.
    #[must_use]
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Both ids become key segments, so neither may contain the segment
    /// separator: `("7:a", "b")` and `("7", "a:b")` must not collide.
    fn key(simulado_id: &str, usuario_id: &str) -> Result<String> {
        for (name, id) in [("simulado_id", simulado_id), ("usuario_id", usuario_id)] {
            if id.trim().is_empty() {
                return Err(CacheError::invalid_key(format!("{name} must not be empty")));
            }
            if id.contains(':') {
                return Err(CacheError::invalid_key(format!(
                    "{name} must not contain ':' (got {id:?})"
                )));
            }
        }
        Ok(format!("{}:{simulado_id}:{usuario_id}", Self::NAMESPACE))
    }

    /// Reads a user's cached result for a simulado.
    pub async fn get<T: DeserializeOwned>(&self, simulado_id: &str, usuario_id: &str) -> Option<T> {
        let key = read_key(Self::key(simulado_id, usuario_id))?;
        self.cache.get(&key).await
    }

    /// Caches a user's result for a simulado.
    pub async fn set<T: Serialize>(
        &self,
        simulado_id: &str,
        usuario_id: &str,
        value: &T,
    ) -> Result<()> {
        let key = Self::key(simulado_id, usuario_id)?;
        let options = SetOptions::new()
            .with_ttl(EXAM_RESULT_TTL)
            .with_dependency(Dependency::simulado(simulado_id))
            .with_dependency(Dependency::usuario(usuario_id));
        self.cache.set(&key, value, options).await
    }

    /// Purges every cached result for a simulado (e.g. after regrading).
    pub async fn invalidate_simulado(&self, simulado_id: &str) {
        self.cache
            .invalidate(&Dependency::simulado(simulado_id))
            .await;
    }

    /// Purges everything cached for a user.
    pub async fn invalidate_usuario(&self, usuario_id: &str) {
        self.cache.invalidate(&Dependency::usuario(usuario_id)).await;
    }
}

/// Caches the weekly question set for a concurso.
///
/// Keys are built with the canonical key encoder from the concurso id and a
/// `{"semana": n}` parameter bag, so the same logical week always maps to
/// the same key.
#[derive(Clone)]
pub struct WeeklyQuestionsCache {
    cache: CacheService,
}

impl WeeklyQuestionsCache {
    const NAMESPACE: &'static str = "questoes_semana";

    /// Wraps the given cache service.
    #[must_use]
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    fn key(concurso_id: &str, semana: u32) -> Result<String> {
        cache_key_with_params(Self::NAMESPACE, concurso_id, &json!({ "semana": semana }))
    }

    /// Reads the cached question set for a concurso week.
    pub async fn get<T: DeserializeOwned>(&self, concurso_id: &str, semana: u32) -> Option<T> {
        let key = read_key(Self::key(concurso_id, semana))?;
        self.cache.get(&key).await
    }

    /// Caches the question set for a concurso week.
    pub async fn set<T: Serialize>(
        &self,
        concurso_id: &str,
        semana: u32,
        value: &T,
    ) -> Result<()> {
        let key = Self::key(concurso_id, semana)?;
        let options = SetOptions::new()
            .with_ttl(WEEKLY_QUESTIONS_TTL)
            .with_dependency(Dependency::concurso(concurso_id));
        self.cache.set(&key, value, options).await
    }

    /// Purges every cached week for a concurso.
    pub async fn invalidate_concurso(&self, concurso_id: &str) {
        self.cache
            .invalidate(&Dependency::concurso(concurso_id))
            .await;
    }
}

/// Caches per-user dashboard aggregates (fast-changing activity data).
#[derive(Clone)]
pub struct DashboardStatsCache {
    cache: CacheService,
}

impl DashboardStatsCache {
    const NAMESPACE: &'static str = "dashboard";

    /// Wraps the given cache service.
    #[must_use]
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    fn options(usuario_id: &str) -> SetOptions {
        SetOptions::new()
            .with_ttl(DASHBOARD_TTL)
            .with_dependency(Dependency::usuario(usuario_id))
    }

    /// Reads the cached dashboard aggregate for a user.
    pub async fn get<T: DeserializeOwned>(&self, usuario_id: &str) -> Option<T> {
        let key = read_key(cache_key(Self::NAMESPACE, usuario_id))?;
        self.cache.get(&key).await
    }

    /// Caches the dashboard aggregate for a user.
    pub async fn set<T: Serialize>(&self, usuario_id: &str, value: &T) -> Result<()> {
        let key = cache_key(Self::NAMESPACE, usuario_id)?;
        self.cache.set(&key, value, Self::options(usuario_id)).await
    }

    /// Reads the dashboard aggregate, computing and caching it on a miss.
    ///
    /// Concurrent misses may each run `compute`; see
    /// [`CacheService::get_or_set`].
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        usuario_id: &str,
        compute: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
    {
        let key = cache_key(Self::NAMESPACE, usuario_id).map_err(E::from)?;
        self.cache
            .get_or_set(&key, Self::options(usuario_id), compute)
            .await
    }

    /// Purges everything cached for a user.
    pub async fn invalidate(&self, usuario_id: &str) {
        self.cache.invalidate(&Dependency::usuario(usuario_id)).await;
    }
}

/// Collapses a key-construction failure on the read path into a miss.
///
/// Reads never fail; a malformed id is logged and treated as absent.
fn read_key(key: Result<String>) -> Option<String> {
    match key {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!(error = %e, "Invalid cache key on read path, treating as miss");
            None
        }
    }
}
