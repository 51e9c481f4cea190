use thiserror::Error;

/// Errors raised by the cache core itself.
///
/// Producer failures are not represented here: they belong to the caller and
/// are handed back unchanged. Backing-store failures are [`StoreError`]s and
/// never reach the caller.
///
/// [`StoreError`]: super::StoreError
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache configuration error: {message}")]
    Configuration { message: String },
    #[error("invalid cache key: {message}")]
    InvalidKey { message: String },
}

impl CacheError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}
