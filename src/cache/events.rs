//! Lifecycle events and the in-memory queue they travel through.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{counter, gauge};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::lock::mutex_lock;

const SOURCE: &str = "cache::events";
const METRIC_EVENT_QUEUE_LEN: &str = "stashline_event_queue_len";
const METRIC_EVENT_DROPPED_TOTAL: &str = "stashline_event_dropped_total";

/// Monotonic sequence number assigned at publish time.
pub type Epoch = u64;

#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Unique identifier, for correlating log lines.
    pub id: Uuid,
    pub epoch: Epoch,
    pub kind: EventKind,
    pub timestamp: OffsetDateTime,
}

impl CacheEvent {
    pub fn new(kind: EventKind, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Host lifecycle changes that make cached values stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A navigation menu was created.
    MenuCreated { menu_id: u64 },
    /// A navigation menu or its items were edited.
    MenuUpdated { menu_id: u64 },
    /// A navigation menu was deleted.
    MenuDeleted { menu_id: u64 },
    /// Any post-like object (post, page, attachment, menu item) was saved.
    PostSaved { post_id: u64 },
}

/// FIFO of pending events.
///
/// Bounded: when full, the oldest event is dropped to make room.
pub struct EventQueue {
    queue: Mutex<VecDeque<CacheEvent>>,
    epoch_counter: AtomicU64,
    limit: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::new_with_limit(usize::MAX)
    }

    pub fn new_with_limit(limit: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
            limit: limit.max(1),
        }
    }

    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Append an event and return the assigned envelope.
    pub fn publish(&self, kind: EventKind) -> CacheEvent {
        let event = CacheEvent::new(kind, self.next_epoch());

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?event.kind,
            "Cache event enqueued"
        );

        let mut queue = mutex_lock(&self.queue, SOURCE, "publish");
        if queue.len() >= self.limit
            && let Some(dropped) = queue.pop_front()
        {
            counter!(METRIC_EVENT_DROPPED_TOTAL).increment(1);
            warn!(
                event_id = %dropped.id,
                event_kind = ?dropped.kind,
                limit = self.limit,
                "Cache event queue full; oldest event dropped"
            );
        }
        queue.push_back(event.clone());
        gauge!(METRIC_EVENT_QUEUE_LEN).set(queue.len() as f64);
        event
    }

    /// Remove up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<CacheEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        let drained: Vec<CacheEvent> = queue.drain(..count).collect();
        gauge!(METRIC_EVENT_QUEUE_LEN).set(queue.len() as f64);
        drained
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
        gauge!(METRIC_EVENT_QUEUE_LEN).set(0.0);
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn publish_assigns_increasing_epochs() {
        let queue = EventQueue::new();

        let first = queue.publish(EventKind::MenuCreated { menu_id: 1 });
        let second = queue.publish(EventKind::PostSaved { post_id: 2 });

        assert!(first.epoch < second.epoch);
        assert!(!first.id.is_nil());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn drain_is_fifo_and_partial() {
        let queue = EventQueue::new();
        queue.publish(EventKind::MenuCreated { menu_id: 1 });
        queue.publish(EventKind::MenuUpdated { menu_id: 1 });
        queue.publish(EventKind::MenuDeleted { menu_id: 1 });

        let events = queue.drain(2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::MenuCreated { menu_id: 1 });
        assert_eq!(events[1].kind, EventKind::MenuUpdated { menu_id: 1 });
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.drain(100).len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_oldest() {
        let queue = EventQueue::new_with_limit(2);
        queue.publish(EventKind::PostSaved { post_id: 1 });
        queue.publish(EventKind::PostSaved { post_id: 2 });
        queue.publish(EventKind::PostSaved { post_id: 3 });

        let kinds: Vec<EventKind> = queue.drain(10).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PostSaved { post_id: 2 },
                EventKind::PostSaved { post_id: 3 }
            ]
        );
    }

    #[test]
    fn clear_empties_queue() {
        let queue = EventQueue::new();
        queue.publish(EventKind::PostSaved { post_id: 1 });
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn event_queue_recovers_from_poisoned_lock() {
        let queue = EventQueue::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = queue.queue.lock().expect("queue lock should be acquired");
            panic!("poison queue lock");
        }));

        queue.publish(EventKind::PostSaved { post_id: 1 });
        assert_eq!(queue.len(), 1);
    }
}
