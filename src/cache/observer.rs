use super::events::CacheEvent;

/// Receiver of lifecycle events.
///
/// Hosts subscribe observers on a [`CacheTrigger`](super::CacheTrigger)
/// instead of registering global hooks. Handlers run synchronously on the
/// publishing thread and must not fail: anything that goes wrong is logged
/// and the cache degrades to recomputing.
pub trait LifecycleObserver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn on_event(&self, event: &CacheEvent);
}
