//! Read-through caching for content-management call sites.
//!
//! [`cache::ReadThroughCache`] is the cache-aside core: look a key up in a
//! namespaced backing store, fall back to a producer on a miss, store the
//! result under a TTL. [`application`] builds the menu, thumbnail and
//! permalink caches on top of it, invalidated by lifecycle events published
//! through [`cache::CacheTrigger`].

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
