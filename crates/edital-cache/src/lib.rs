//! Two-tier caching for the Edital study platform.
//!
//! ## Architecture
//!
//! - **Memory tier (DashMap)**: process-local, microsecond latency
//! - **Persistent tier (Postgres table)**: durable, shared across instances,
//!   survives restarts (implemented in `edital-cache-postgres`)
//!
//! ```text
//! GET request → memory tier → persistent tier → source (DB query)
//!                   ↓               ↓                 ↓
//!               <1µs latency   ~ms latency       recompute
//! ```
//!
//! Entries carry a TTL-derived absolute expiry plus dependency tags
//! (`usuario:42`, `simulado:7`, ...) used for fan-out invalidation: one
//! "user changed" event purges every cached aggregate derived from that
//! user's data, in both tiers, without enumerating keys.
//!
//! ## Graceful Degradation
//!
//! If the persistent tier is unreachable or not yet migrated, the system
//! automatically falls back to memory-only behavior; cache failures never
//! become caller-facing errors.

pub mod domains;
pub mod entry;
pub mod error;
pub mod key;
pub mod memory;
pub mod service;
pub mod tier;
pub mod ttl;

pub use domains::{DashboardStatsCache, ExamResultCache, UserProgressCache, WeeklyQuestionsCache};
pub use entry::{Dependency, DependencyKind, SetOptions};
pub use error::{CacheError, ErrorCategory, TierError};
pub use key::{cache_key, cache_key_with_params, canonical_json};
pub use memory::{MemoryEntry, MemoryTier};
pub use service::{CacheConfig, CacheService, CacheStatistics, Lookup, TierKind};
pub use tier::{NoopTier, PersistedEntry, PersistentStats, PersistentTier};
pub use ttl::TtlPolicy;
