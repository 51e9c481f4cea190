//! Read-through (cache-aside) cache bound to one namespace.
//!
//! ```text
//! get(key, producer)
//!   ├─ store hit, decodes, policy accepts ──► stored value, producer untouched
//!   └─ otherwise ──► producer(key)
//!                      ├─ Err(e) ──► Err(e), nothing stored
//!                      ├─ Ok(v), not cacheable ──► Ok(v), nothing stored
//!                      └─ Ok(v) ──► store(key, v) ──► Ok(v)
//! ```
//!
//! Store failures never reach the caller: a failed read is a miss and a
//! failed write is logged and dropped.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::backend::{CacheBackend, StoreError};
use super::config::CacheConfig;
use super::namespace::Namespace;
use super::policy::CachePolicy;

const METRIC_CACHE_HIT_TOTAL: &str = "stashline_cache_hit_total";
const METRIC_CACHE_MISS_TOTAL: &str = "stashline_cache_miss_total";
const METRIC_CACHE_STORE_SKIPPED_TOTAL: &str = "stashline_cache_store_skipped_total";
const METRIC_CACHE_STORE_ERROR_TOTAL: &str = "stashline_cache_store_error_total";
const METRIC_CACHE_INVALIDATE_TOTAL: &str = "stashline_cache_invalidate_total";

pub struct ReadThroughCache<V> {
    config: CacheConfig,
    backend: Arc<dyn CacheBackend>,
    policy: CachePolicy<V>,
    _value: PhantomData<fn() -> V>,
}

impl<V> ReadThroughCache<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn new(config: CacheConfig, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            config,
            backend,
            policy: CachePolicy::default(),
            _value: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: CachePolicy<V>) -> Self {
        self.policy = policy;
        self
    }

    /// A cache for another value type on the same namespace, TTL and store.
    ///
    /// Call sites that keep several kinds of entries in one group (menu ids,
    /// locations, items) build one sibling per kind. The sibling starts with
    /// the default policy.
    pub fn sibling<W>(&self) -> ReadThroughCache<W>
    where
        W: Serialize + DeserializeOwned,
    {
        ReadThroughCache::new(self.config.clone(), Arc::clone(&self.backend))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn namespace(&self) -> &Namespace {
        &self.config.namespace
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn policy(&self) -> &CachePolicy<V> {
        &self.policy
    }

    /// Return the cached value for `key`, invoking `producer` on a miss.
    ///
    /// The producer's error is returned as-is and nothing is stored, so the
    /// producer runs again on the next call. A successful value is stored
    /// only when the policy deems it cacheable.
    pub fn get<E, F>(&self, key: &str, producer: F) -> Result<V, E>
    where
        F: FnOnce(&str) -> Result<V, E>,
    {
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }

        let value = producer(key)?;

        if self.policy.is_cacheable(&value) {
            self.store(key, &value);
        } else {
            counter!(METRIC_CACHE_STORE_SKIPPED_TOTAL, "namespace" => self.label())
                .increment(1);
            debug!(
                namespace = %self.config.namespace,
                key,
                result = "not_cacheable",
                "Produced value not stored"
            );
        }

        Ok(value)
    }

    /// Look `key` up without falling back to a producer.
    ///
    /// `None` covers absent, expired, undecodable and policy-rejected entries
    /// as well as store read failures.
    pub fn lookup(&self, key: &str) -> Option<V> {
        let namespace = &self.config.namespace;

        let raw = match self.backend.get(namespace, key) {
            Ok(raw) => raw,
            Err(err) => {
                self.record_store_error("get", key, &err);
                None
            }
        };

        let value = raw.and_then(|raw| match serde_json::from_value::<V>(raw) {
            Ok(value) if self.policy.accepts_hit(&value) => Some(value),
            Ok(_) => {
                debug!(%namespace, key, result = "rejected", "Cached value refused by hit policy");
                None
            }
            Err(err) => {
                debug!(
                    %namespace,
                    key,
                    result = "undecodable",
                    error = %err,
                    "Cached value has an unexpected shape"
                );
                None
            }
        });

        match value {
            Some(value) => {
                counter!(METRIC_CACHE_HIT_TOTAL, "namespace" => self.label()).increment(1);
                debug!(%namespace, key, result = "hit", "Cache lookup");
                Some(value)
            }
            None => {
                counter!(METRIC_CACHE_MISS_TOTAL, "namespace" => self.label()).increment(1);
                debug!(%namespace, key, result = "miss", "Cache lookup");
                None
            }
        }
    }

    /// Write `value` under `key` with the configured TTL, bypassing the
    /// cacheable predicate.
    ///
    /// Best effort: returns false when the value could not be written.
    pub fn store(&self, key: &str, value: &V) -> bool {
        let raw = match serde_json::to_value(value) {
            Ok(raw) => raw,
            Err(source) => {
                let err = StoreError::Codec {
                    key: key.to_string(),
                    source,
                };
                self.record_store_error("set", key, &err);
                return false;
            }
        };

        match self
            .backend
            .set(&self.config.namespace, key, raw, self.config.ttl)
        {
            Ok(()) => true,
            Err(err) => {
                self.record_store_error("set", key, &err);
                false
            }
        }
    }

    /// Remove `key`. Idempotent; returns whether an entry was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        match self.backend.delete(&self.config.namespace, key) {
            Ok(removed) => {
                counter!(METRIC_CACHE_INVALIDATE_TOTAL, "namespace" => self.label()).increment(1);
                debug!(
                    namespace = %self.config.namespace,
                    key,
                    removed,
                    "Cache entry invalidated"
                );
                removed
            }
            Err(err) => {
                self.record_store_error("delete", key, &err);
                false
            }
        }
    }

    /// Remove every key in `keys`, returning how many entries were removed.
    pub fn invalidate_all<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .filter(|key| self.invalidate(key.as_ref()))
            .count()
    }

    fn label(&self) -> String {
        self.config.namespace.to_string()
    }

    fn record_store_error(&self, op: &'static str, key: &str, err: &StoreError) {
        counter!(
            METRIC_CACHE_STORE_ERROR_TOTAL,
            "namespace" => self.label(),
            "op" => op
        )
        .increment(1);
        warn!(
            namespace = %self.config.namespace,
            key,
            op,
            backend = self.backend.backend_name(),
            error = %err,
            result = "degraded",
            "Cache store operation failed; continuing without cache"
        );
    }
}

impl<V> Clone for ReadThroughCache<V> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            backend: Arc::clone(&self.backend),
            policy: self.policy.clone(),
            _value: PhantomData,
        }
    }
}
