//! Error types for qforge

use thiserror::Error;

/// Result type alias for qforge operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors raised while describing records or building statements.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Contradictory or unsupported field metadata
    #[error("Metadata error on '{record}': {message}")]
    Metadata { record: String, message: String },

    /// A patch resolved zero applicable fields
    #[error("Empty patch: {0}")]
    EmptyPatch(String),

    /// Caller input rejected before any SQL was produced
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration text could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create a metadata error for a record type
    pub fn metadata(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metadata {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create an empty patch error
    pub fn empty_patch(message: impl Into<String>) -> Self {
        Self::EmptyPatch(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a metadata error
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Check if this is an empty patch error
    pub fn is_empty_patch(&self) -> bool {
        matches!(self, Self::EmptyPatch(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Failure reported by a cache backend.
///
/// These never escape [`compute_with_cache`](crate::cache::compute_with_cache);
/// they are logged and the call degrades to direct computation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached
    #[error("cache '{cache}' unavailable: {message}")]
    Unavailable { cache: String, message: String },

    /// The backend rejected the operation
    #[error("cache '{cache}' operation failed: {message}")]
    Backend { cache: String, message: String },
}

impl CacheError {
    pub fn unavailable(cache: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            cache: cache.into(),
            message: message.into(),
        }
    }

    pub fn backend(cache: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            cache: cache.into(),
            message: message.into(),
        }
    }
}
