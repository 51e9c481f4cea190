//! Cached membership index.
//!
//! An index is a single entry whose value lists the identifiers of other
//! entries ("every menu id"). Building it usually means a full scan, so
//! membership changes are applied in place instead of recomputing it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::read_through::ReadThroughCache;

pub struct CachedIndex<T> {
    cache: ReadThroughCache<Vec<T>>,
    key: String,
}

impl<T> CachedIndex<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    pub fn new(cache: ReadThroughCache<Vec<T>>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current members; `scan` rebuilds the list when it is not cached.
    pub fn members<E, F>(&self, scan: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        self.cache.get(&self.key, |_| scan())
    }

    /// Add `member` unless already present and write the index back.
    pub fn add<E, F>(&self, member: T, scan: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        let mut members = self.members(scan)?;
        if !members.contains(&member) {
            members.push(member);
        }
        self.cache.store(&self.key, &members);
        Ok(members)
    }

    /// Remove `member` if present and write the index back.
    pub fn remove<E, F>(&self, member: &T, scan: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        let mut members = self.members(scan)?;
        if let Some(position) = members.iter().position(|candidate| candidate == member) {
            members.remove(position);
        }
        self.cache.store(&self.key, &members);
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use super::*;
    use crate::cache::config::CacheConfig;
    use crate::cache::store::MemoryStore;

    fn index() -> CachedIndex<u64> {
        let backend = Arc::new(MemoryStore::new(NonZeroUsize::new(16).expect("capacity")));
        let cache = ReadThroughCache::new(CacheConfig::new("menus").expect("config"), backend);
        CachedIndex::new(cache, "ids")
    }

    #[test]
    fn add_and_remove_do_not_rescan_a_cached_index() {
        let index = index();
        let scans = Cell::new(0);
        let scan = || -> Result<Vec<u64>, ()> {
            scans.set(scans.get() + 1);
            Ok(vec![1, 2, 3])
        };

        assert_eq!(index.members(scan), Ok(vec![1, 2, 3]));
        assert_eq!(index.add(4, scan), Ok(vec![1, 2, 3, 4]));
        assert_eq!(index.add(4, scan), Ok(vec![1, 2, 3, 4]));
        assert_eq!(index.remove(&2, scan), Ok(vec![1, 3, 4]));
        assert_eq!(index.members(scan), Ok(vec![1, 3, 4]));
        assert_eq!(scans.get(), 1);
    }

    #[test]
    fn add_on_cold_index_scans_first() {
        let index = index();
        let members = index.add(9, || Ok::<_, ()>(vec![1]));
        assert_eq!(members, Ok(vec![1, 9]));
    }

    #[test]
    fn scan_failure_leaves_index_untouched() {
        let index = index();
        assert_eq!(index.add(1, || Err::<Vec<u64>, _>("scan failed")), Err("scan failed"));
        assert_eq!(index.members(|| Ok::<_, &str>(vec![2])), Ok(vec![2]));
    }
}
