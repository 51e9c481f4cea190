use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use metrics_util::debugging::DebuggingRecorder;
use stashline::cache::{
    CacheBackend, CacheConfig, CacheConsumer, CachePolicy, EventConfig, EventKind, EventQueue,
    MemoryStore, Namespace, ReadThroughCache, StoreError,
};

struct DownStore;

impl CacheBackend for DownStore {
    fn get(&self, _namespace: &Namespace, _key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Err(StoreError::unavailable("down"))
    }

    fn set(
        &self,
        _namespace: &Namespace,
        _key: &str,
        _value: serde_json::Value,
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Err(StoreError::unavailable("down"))
    }

    fn delete(&self, _namespace: &Namespace, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::unavailable("down"))
    }

    fn backend_name(&self) -> &'static str {
        "down"
    }
}

#[test]
fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        // hit / miss / skipped / invalidate / evict
        let store = Arc::new(MemoryStore::new(NonZeroUsize::new(1).unwrap()));
        let cache: ReadThroughCache<Vec<u64>> =
            ReadThroughCache::new(CacheConfig::new("menus").unwrap(), store.clone())
                .with_policy(CachePolicy::cache_all().with_cacheable(|ids: &Vec<u64>| !ids.is_empty()));
        cache.get("ids", |_| Ok::<_, ()>(vec![1])).unwrap();
        cache.get("ids", |_| Ok::<_, ()>(vec![1])).unwrap();
        cache.get("empty", |_| Ok::<_, ()>(Vec::new())).unwrap();
        cache.store("other", &vec![2]);
        cache.invalidate("other");

        // store errors
        let degraded: ReadThroughCache<u8> =
            ReadThroughCache::new(CacheConfig::new("down").unwrap(), Arc::new(DownStore));
        degraded.get("k", |_| Ok::<_, ()>(1)).unwrap();

        // queue length + drops
        let queue = EventQueue::new_with_limit(1);
        queue.publish(EventKind::MenuCreated { menu_id: 1 });
        queue.publish(EventKind::MenuCreated { menu_id: 2 });

        // consumption latency
        let queue = Arc::new(EventQueue::new_with_limit(16));
        let consumer = CacheConsumer::new(EventConfig::default(), queue.clone());
        queue.publish(EventKind::PostSaved { post_id: 1 });
        assert!(consumer.consume());
    });

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "stashline_cache_hit_total",
        "stashline_cache_miss_total",
        "stashline_cache_store_skipped_total",
        "stashline_cache_store_error_total",
        "stashline_cache_invalidate_total",
        "stashline_store_evict_total",
        "stashline_event_queue_len",
        "stashline_event_dropped_total",
        "stashline_consume_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
