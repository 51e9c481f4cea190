//! Per-instance cache configuration.
//!
//! Values normally come from [`crate::config::CacheSettings`]; everything has
//! a default so a cache can also be built by hand.

use std::time::Duration;

use super::error::CacheError;
use super::namespace::Namespace;
use crate::config::CacheSettings;

/// Time-to-live applied when nothing else is configured (24h).
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

const DEFAULT_CONSUME_BATCH_LIMIT: usize = 100;
const DEFAULT_EVENT_QUEUE_LIMIT: usize = 1_024;

/// Configuration of one [`ReadThroughCache`](super::ReadThroughCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Cache group; must be unique among caches sharing a store.
    pub namespace: Namespace,
    /// TTL applied to every entry written through this cache.
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn new(namespace: impl Into<String>) -> Result<Self, CacheError> {
        Ok(Self {
            namespace: Namespace::new(namespace)?,
            ttl: DEFAULT_TTL,
        })
    }

    /// Build a config whose TTL follows the settings: a per-namespace
    /// override when present, the global default otherwise.
    pub fn from_settings(
        namespace: impl Into<String>,
        settings: &CacheSettings,
    ) -> Result<Self, CacheError> {
        let namespace = Namespace::new(namespace)?;
        let ttl = settings.ttl_for(namespace.as_str());
        Ok(Self { namespace, ttl })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_ttl_seconds(self, seconds: u64) -> Self {
        self.with_ttl(Duration::from_secs(seconds))
    }
}

/// Configuration of the lifecycle event plumbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    /// When false, triggers drop events instead of publishing them.
    pub enabled: bool,
    /// Maximum events dispatched per consumption pass.
    pub consume_batch_limit: usize,
    /// Maximum pending events; the oldest is dropped on overflow.
    pub queue_limit: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            consume_batch_limit: DEFAULT_CONSUME_BATCH_LIMIT,
            queue_limit: DEFAULT_EVENT_QUEUE_LIMIT,
        }
    }
}

impl From<&CacheSettings> for EventConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            consume_batch_limit: settings.consume_batch_limit.get(),
            queue_limit: settings.event_queue_limit.get(),
        }
    }
}
