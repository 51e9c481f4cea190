//! Per-call-site hit and store policies.

use std::fmt;
use std::sync::Arc;

type Predicate<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Decides, per cache instance, which found entries count as hits and which
/// produced values are worth storing.
///
/// The default accepts every decodable entry and stores every value the
/// producer returns. Call sites narrow it: menu items refuse to store an
/// empty list, a thumbnail map is only a hit when it holds the requested
/// size.
pub struct CachePolicy<V> {
    cacheable: Predicate<V>,
    hit: Predicate<V>,
}

impl<V> CachePolicy<V> {
    pub fn cache_all() -> Self {
        Self {
            cacheable: Arc::new(|_| true),
            hit: Arc::new(|_| true),
        }
    }

    /// Only store produced values for which `predicate` holds.
    pub fn with_cacheable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.cacheable = Arc::new(predicate);
        self
    }

    /// Only treat found entries for which `predicate` holds as hits.
    pub fn with_hit<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.hit = Arc::new(predicate);
        self
    }

    pub fn is_cacheable(&self, value: &V) -> bool {
        (self.cacheable)(value)
    }

    pub fn accepts_hit(&self, value: &V) -> bool {
        (self.hit)(value)
    }
}

impl<V> Clone for CachePolicy<V> {
    fn clone(&self) -> Self {
        Self {
            cacheable: Arc::clone(&self.cacheable),
            hit: Arc::clone(&self.hit),
        }
    }
}

impl<V> Default for CachePolicy<V> {
    fn default() -> Self {
        Self::cache_all()
    }
}

impl<V> fmt::Debug for CachePolicy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_everything() {
        let policy = CachePolicy::<Vec<u64>>::default();
        assert!(policy.is_cacheable(&Vec::new()));
        assert!(policy.accepts_hit(&Vec::new()));
    }

    #[test]
    fn predicates_are_independent() {
        let policy = CachePolicy::<Vec<u64>>::cache_all().with_cacheable(|items| !items.is_empty());

        assert!(!policy.is_cacheable(&Vec::new()));
        assert!(policy.is_cacheable(&vec![1]));
        // an empty list that somehow got stored is still a hit
        assert!(policy.accepts_hit(&Vec::new()));
    }
}
