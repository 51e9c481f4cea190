//! Stashline cache core
//!
//! A read-through cache bound to a namespace, the backing-store contract it
//! talks to, and the lifecycle plumbing that invalidates it:
//!
//! - **`ReadThroughCache`**: cache-aside `get`, `lookup`, `store`,
//!   `invalidate`, `invalidate_all`
//! - **`CachedIndex`**: a cached membership list maintained incrementally
//! - **`CacheBackend`**: `MemoryStore` (TTL + LRU) or `NullStore`, or any
//!   host-supplied store
//! - **`CacheTrigger`**: publishes lifecycle events to subscribed
//!   `LifecycleObserver`s
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! default_ttl_seconds = 86400
//! store_capacity = 10000
//!
//! [cache.namespaces."theme.permalinks"]
//! ttl_seconds = 3600
//! ```

mod backend;
mod clock;
mod config;
mod consumer;
mod error;
mod events;
mod index;
mod lock;
mod namespace;
mod observer;
mod policy;
mod read_through;
mod store;
mod trigger;

pub use backend::{CacheBackend, StoreError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_TTL, EventConfig};
pub use consumer::CacheConsumer;
pub use error::CacheError;
pub use events::{CacheEvent, Epoch, EventKind, EventQueue};
pub use index::CachedIndex;
pub use namespace::Namespace;
pub use observer::LifecycleObserver;
pub use policy::CachePolicy;
pub use read_through::ReadThroughCache;
pub use store::{MemoryStore, NullStore};
pub use trigger::CacheTrigger;
