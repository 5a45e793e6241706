//! Dependency tags and write options for cache entries.
//!
//! Every cache entry can be tagged with one or more logical dependencies
//! (a `(kind, id)` pair such as "user 42" or "simulado 7"). Invalidating a
//! dependency removes every entry tagged with it, in both tiers, without the
//! invalidator having to enumerate derived keys.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The kind of domain object a cache entry depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// A platform user.
    Usuario,
    /// A practice exam (simulado).
    Simulado,
    /// A public exam (concurso).
    Concurso,
    /// A study guide (apostila).
    Apostila,
    /// A flashcard deck.
    Flashcard,
}

impl DependencyKind {
    /// Stable string form used in tags and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usuario => "usuario",
            Self::Simulado => "simulado",
            Self::Concurso => "concurso",
            Self::Apostila => "apostila",
            Self::Flashcard => "flashcard",
        }
    }

    /// Parses a kind from its stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "usuario" => Some(Self::Usuario),
            "simulado" => Some(Self::Simulado),
            "concurso" => Some(Self::Concurso),
            "apostila" => Some(Self::Apostila),
            "flashcard" => Some(Self::Flashcard),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical dependency attached to a cache entry.
///
/// Encoded as `"<kind>:<id>"` (e.g. `usuario:42`) when stored in the
/// persistent tier, so that tag matching can be done with an array-contains
/// query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// What kind of object this entry depends on.
    pub kind: DependencyKind,
    /// The object's identifier.
    pub id: String,
}

impl Dependency {
    /// Creates a dependency tag.
    #[must_use]
    pub fn new(kind: DependencyKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Creates a `usuario` dependency.
    #[must_use]
    pub fn usuario(id: impl Into<String>) -> Self {
        Self::new(DependencyKind::Usuario, id)
    }

    /// Creates a `simulado` dependency.
    #[must_use]
    pub fn simulado(id: impl Into<String>) -> Self {
        Self::new(DependencyKind::Simulado, id)
    }

    /// Creates a `concurso` dependency.
    #[must_use]
    pub fn concurso(id: impl Into<String>) -> Self {
        Self::new(DependencyKind::Concurso, id)
    }

    /// Creates an `apostila` dependency.
    #[must_use]
    pub fn apostila(id: impl Into<String>) -> Self {
        Self::new(DependencyKind::Apostila, id)
    }

    /// Creates a `flashcard` dependency.
    #[must_use]
    pub fn flashcard(id: impl Into<String>) -> Self {
        Self::new(DependencyKind::Flashcard, id)
    }

    /// The stable `"<kind>:<id>"` encoding used by the persistent tier.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }

    /// Parses a dependency back from its `"<kind>:<id>"` tag encoding.
    ///
    /// Returns `None` for unknown kinds or malformed tags; unknown tags in
    /// storage are skipped rather than treated as errors.
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let (kind, id) = tag.split_once(':')?;
        if id.is_empty() {
            return None;
        }
        Some(Self::new(DependencyKind::parse(kind)?, id))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Options for a cache write.
///
/// When `ttl` is absent, the service derives one from its [TTL policy] based
/// on the key's prefix.
///
/// [TTL policy]: crate::ttl::TtlPolicy
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Explicit time-to-live; overrides the prefix-based default.
    pub ttl: Option<Duration>,
    /// Dependencies to tag the entry with, in both tiers.
    pub dependencies: Vec<Dependency>,
}

impl SetOptions {
    /// Creates empty options: policy-derived TTL, no dependencies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Adds a dependency tag.
    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Replaces the dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }
}
