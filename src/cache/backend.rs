//! Backing-store contract.
//!
//! The host supplies the store; the cache core only ever issues single-key
//! `get`, `set` and `delete` calls against it. Whatever atomicity the store
//! gives those calls is all the consistency the core has.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::namespace::Namespace;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache store unavailable: {message}")]
    Unavailable { message: String },
    #[error("failed to encode cache value for `{key}`: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Key/value store with per-entry TTL.
///
/// - `get` returns `Ok(None)` for absent and expired entries alike.
/// - `set` overwrites any existing entry. A zero `ttl` means no expiry.
/// - `delete` reports whether an entry was removed and is idempotent.
pub trait CacheBackend: Send + Sync {
    fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(
        &self,
        namespace: &Namespace,
        key: &str,
        value: Value,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    fn delete(&self, namespace: &Namespace, key: &str) -> Result<bool, StoreError>;

    fn backend_name(&self) -> &'static str;
}
