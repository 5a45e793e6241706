//! Error types for the cache subsystem.
//!
//! The cache is best-effort by design: read-path failures from the persistent
//! tier never reach callers (they degrade to a miss), and write-path failures
//! only reach callers when they indicate a local logic bug such as a value
//! that cannot be serialized.

use std::fmt;

/// Errors that the cache service can surface to callers.
///
/// Note that this set is deliberately small. Persistent-tier failures are
/// absorbed at the service boundary and reported through logging and
/// statistics instead of being propagated.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The value could not be (de)serialized as JSON.
    ///
    /// On `set` this is propagated because silently dropping the caller's
    /// data would be worse than failing loudly.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An empty or blank pattern was passed to a destructive clear operation.
    #[error("Invalid pattern: {message}")]
    InvalidPattern {
        /// Description of why the pattern was rejected.
        message: String,
    },

    /// A malformed cache key or key component.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of why the key was rejected.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `InvalidPattern` error.
    #[must_use]
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidPattern { .. } | Self::InvalidKey { .. } => ErrorCategory::Validation,
        }
    }
}

/// Errors raised by a persistent tier implementation.
///
/// These never cross the cache-service boundary; the service logs them and
/// treats the operation as a tier-level miss or no-op.
#[derive(Debug, thiserror::Error)]
pub enum TierError {
    /// The tier is unreachable or not yet provisioned (e.g. the cache table
    /// has not been migrated on a fresh deploy).
    #[error("Tier unavailable: {message}")]
    Unavailable {
        /// Description of the availability problem.
        message: String,
    },

    /// A query against the tier failed.
    #[error("Query error: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },

    /// A stored value could not be decoded into the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl TierError {
    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Query` error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns `true` if this error means the tier itself is unreachable,
    /// as opposed to a single query failing.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unavailable { .. } => ErrorCategory::Infrastructure,
            Self::Query { .. } => ErrorCategory::Internal,
            Self::Decode { .. } => ErrorCategory::Serialization,
        }
    }
}

/// Categories of cache errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input validation error.
    Validation,
    /// Value (de)serialization error.
    Serialization,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Convenience result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
