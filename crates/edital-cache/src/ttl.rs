//! Prefix-based TTL defaults.
//!
//! Each domain facade writes under a stable key prefix, and each prefix has a
//! default TTL matching how fast that data changes: short for activity feeds,
//! longer for slow-moving aggregates, much longer for near-static content.
//! An explicit TTL on a write always overrides the prefix default.

use std::time::Duration;

/// Default TTL for keys whose prefix has no specific rule.
pub const FALLBACK_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for dashboard aggregates (fast-changing activity data).
pub const DASHBOARD_TTL: Duration = Duration::from_secs(2 * 60);

/// TTL for per-user study progress.
pub const USER_PROGRESS_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for graded practice exam results.
pub const EXAM_RESULT_TTL: Duration = Duration::from_secs(30 * 60);

/// TTL for the weekly question set (changes once a week).
pub const WEEKLY_QUESTIONS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for apostila content (near-static).
pub const APOSTILA_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Maps key prefixes to default TTLs.
///
/// Rules are checked in insertion order; the first prefix match wins.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    rules: Vec<(String, Duration)>,
    fallback: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(FALLBACK_TTL)
            .with_rule("dashboard", DASHBOARD_TTL)
            .with_rule("progresso_usuario", USER_PROGRESS_TTL)
            .with_rule("resultado_simulado", EXAM_RESULT_TTL)
            .with_rule("questoes_semana", WEEKLY_QUESTIONS_TTL)
            .with_rule("apostila", APOSTILA_TTL)
    }
}

impl TtlPolicy {
    /// Creates an empty policy with the given fallback TTL.
    #[must_use]
    pub fn new(fallback: Duration) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Adds a prefix rule.
    #[must_use]
    pub fn with_rule(mut self, prefix: impl Into<String>, ttl: Duration) -> Self {
        self.rules.push((prefix.into(), ttl));
        self
    }

    /// Returns the default TTL for the given key.
    #[must_use]
    pub fn ttl_for(&self, key: &str) -> Duration {
        self.rules
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
            .map(|(_, ttl)| *ttl)
            .unwrap_or(self.fallback)
    }

    /// Returns the fallback TTL.
    #[must_use]
    pub fn fallback(&self) -> Duration {
        self.fallback
    }
}
