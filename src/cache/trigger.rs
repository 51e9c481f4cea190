//! Cache trigger service.
//!
//! The entry point hosts call from their write paths. It publishes lifecycle
//! events and, by default, dispatches them to the subscribed observers right
//! away so the next read already sees fresh data.

use std::sync::Arc;

use tracing::debug;

use super::config::EventConfig;
use super::consumer::CacheConsumer;
use super::events::{EventKind, EventQueue};
use super::observer::LifecycleObserver;

/// # Usage
///
/// ```ignore
/// let trigger = CacheTrigger::from_config(EventConfig::default());
/// trigger.subscribe(menus.clone());
/// trigger.subscribe(permalinks.clone());
///
/// // after the host saved post 42:
/// trigger.post_saved(42);
/// ```
pub struct CacheTrigger {
    config: EventConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: EventConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    /// Build the queue and consumer from `config`.
    pub fn from_config(config: EventConfig) -> Self {
        let queue = Arc::new(EventQueue::new_with_limit(config.queue_limit));
        let consumer = Arc::new(CacheConsumer::new(config.clone(), queue.clone()));
        Self::new(config, queue, consumer)
    }

    pub fn subscribe(&self, observer: Arc<dyn LifecycleObserver>) {
        self.consumer.subscribe(observer);
    }

    /// Publish an event, dispatching it immediately when `consume_now`.
    ///
    /// Otherwise the event waits for the next [`CacheConsumer::consume`].
    pub fn trigger(&self, kind: EventKind, consume_now: bool) {
        if !self.config.enabled {
            debug!(event_kind = ?kind, "Cache trigger skipped: cache disabled");
            return;
        }

        self.queue.publish(kind);

        if consume_now {
            self.consumer.consume_all();
        }
    }

    pub fn menu_created(&self, menu_id: u64) {
        self.trigger(EventKind::MenuCreated { menu_id }, true);
    }

    pub fn menu_updated(&self, menu_id: u64) {
        self.trigger(EventKind::MenuUpdated { menu_id }, true);
    }

    pub fn menu_deleted(&self, menu_id: u64) {
        self.trigger(EventKind::MenuDeleted { menu_id }, true);
    }

    pub fn post_saved(&self, post_id: u64) {
        self.trigger(EventKind::PostSaved { post_id }, true);
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}
