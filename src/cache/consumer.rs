//! Event consumer: drains the queue and dispatches to observers.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use metrics::histogram;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::config::EventConfig;
use super::events::EventQueue;
use super::lock::{rw_read, rw_write};
use super::observer::LifecycleObserver;

const SOURCE: &str = "cache::consumer";
const METRIC_CONSUME_MS: &str = "stashline_consume_ms";

/// Hands queued events to every subscribed observer.
///
/// Events are delivered in publish order; each event reaches all observers
/// before the next one is dispatched.
pub struct CacheConsumer {
    config: EventConfig,
    queue: Arc<EventQueue>,
    observers: RwLock<Vec<Arc<dyn LifecycleObserver>>>,
}

impl CacheConsumer {
    pub fn new(config: EventConfig, queue: Arc<EventQueue>) -> Self {
        Self {
            config,
            queue,
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn LifecycleObserver>) {
        debug!(observer = observer.name(), "Lifecycle observer subscribed");
        rw_write(&self.observers, SOURCE, "subscribe").push(observer);
    }

    pub fn observer_count(&self) -> usize {
        rw_read(&self.observers, SOURCE, "observer_count").len()
    }

    /// Dispatch up to one batch of pending events.
    ///
    /// Returns true if any events were processed.
    #[instrument(skip(self))]
    pub fn consume(&self) -> bool {
        let started_at = Instant::now();
        let events = self.queue.drain(self.config.consume_batch_limit);
        if events.is_empty() {
            return false;
        }

        let event_ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();
        // snapshot so observers may subscribe others without deadlocking
        let observers = rw_read(&self.observers, SOURCE, "consume").clone();

        info!(
            event_count = events.len(),
            event_ids = ?event_ids,
            observer_count = observers.len(),
            "Cache consumption starting"
        );

        for event in &events {
            for observer in &observers {
                debug!(
                    observer = observer.name(),
                    event_id = %event.id,
                    event_kind = ?event.kind,
                    "Dispatching cache event"
                );
                observer.on_event(event);
            }
        }

        info!(event_count = events.len(), "Cache consumption complete");

        histogram!(METRIC_CONSUME_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        true
    }

    /// Dispatch batches until the queue is empty. Returns the number of
    /// batches processed.
    pub fn consume_all(&self) -> usize {
        let mut batches = 0;
        while self.consume() {
            batches += 1;
        }
        batches
    }
}
