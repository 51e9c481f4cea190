//! Backing-store implementations.
//!
//! `MemoryStore`: in-process table with TTL expiry and LRU eviction.
//! `NullStore`: remembers nothing; every read is a miss.

use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use lru::LruCache;
use metrics::counter;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use super::backend::{CacheBackend, StoreError};
use super::clock::{Clock, SystemClock, expiry};
use super::lock::{rw_read, rw_write};
use super::namespace::Namespace;
use crate::config::CacheSettings;

const SOURCE: &str = "cache::store";
const METRIC_STORE_EVICT_TOTAL: &str = "stashline_store_evict_total";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    namespace: String,
    key: String,
}

impl EntryKey {
    fn new(namespace: &Namespace, key: &str) -> Self {
        Self {
            namespace: namespace.as_str().to_string(),
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    expires_at: Option<OffsetDateTime>,
}

impl StoredEntry {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store shared by every cache of a host process.
///
/// Expired entries are purged lazily when read, so an expired entry is
/// indistinguishable from an absent one. When the table is full the least
/// recently used entry is evicted.
pub struct MemoryStore {
    entries: RwLock<LruCache<EntryKey, StoredEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            clock,
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.store_capacity)
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    /// Drop every expired entry now instead of waiting for it to be read.
    ///
    /// Returns how many entries were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = rw_write(&self.entries, SOURCE, "purge_expired");
        let expired: Vec<EntryKey> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }
}

impl CacheBackend for MemoryStore {
    fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        let entry_key = EntryKey::new(namespace, key);
        let now = self.clock.now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        let found = entries
            .get(&entry_key)
            .map(|entry| (entry.is_expired(now), entry.value.clone()));

        match found {
            Some((true, _)) => {
                entries.pop(&entry_key);
                debug!(%namespace, key, "Expired cache entry purged on read");
                Ok(None)
            }
            Some((false, value)) => Ok(Some(value)),
            None => Ok(None),
        }
    }

    fn set(
        &self,
        namespace: &Namespace,
        key: &str,
        value: Value,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let entry_key = EntryKey::new(namespace, key);
        let entry = StoredEntry {
            value,
            expires_at: expiry(self.clock.now(), ttl),
        };

        let displaced = rw_write(&self.entries, SOURCE, "set").push(entry_key.clone(), entry);
        if let Some((evicted, _)) = displaced
            && evicted != entry_key
        {
            counter!(METRIC_STORE_EVICT_TOTAL, "namespace" => evicted.namespace.clone())
                .increment(1);
            debug!(
                namespace = %evicted.namespace,
                key = %evicted.key,
                "Cache entry evicted for capacity"
            );
        }
        Ok(())
    }

    fn delete(&self, namespace: &Namespace, key: &str) -> Result<bool, StoreError> {
        let entry_key = EntryKey::new(namespace, key);
        Ok(rw_write(&self.entries, SOURCE, "delete")
            .pop(&entry_key)
            .is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// NullStore
// ============================================================================

/// Store that accepts writes and forgets them. Wiring it in turns every
/// cache into a pass-through to its producer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl CacheBackend for NullStore {
    fn get(&self, _namespace: &Namespace, _key: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    fn set(
        &self,
        _namespace: &Namespace,
        _key: &str,
        _value: Value,
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    fn delete(&self, _namespace: &Namespace, _key: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}
