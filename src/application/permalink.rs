//! Cached post permalinks.
//!
//! Absolute URLs are cached without their scheme (`//host/path/`) so the
//! page can pick http or https when rendering. Once cached, a permalink is
//! returned as-is until the post is saved again.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::repos::{PermalinkRepo, RepoError};
use crate::cache::{
    CacheBackend, CacheConfig, CacheEvent, EventKind, LifecycleObserver, ReadThroughCache,
};
use crate::domain::post_ref::PostRef;

pub struct PermalinkCache {
    repo: Arc<dyn PermalinkRepo>,
    cache: ReadThroughCache<String>,
}

impl PermalinkCache {
    pub fn new(
        config: CacheConfig,
        backend: Arc<dyn CacheBackend>,
        repo: Arc<dyn PermalinkRepo>,
    ) -> Self {
        Self {
            repo,
            cache: ReadThroughCache::new(config, backend),
        }
    }

    /// The post's permalink without scheme; empty when the post cannot be
    /// resolved.
    pub fn permalink(&self, post: impl Into<PostRef>, leave_name: bool) -> String {
        let post = post.into();
        let key = match post.cache_key() {
            Ok(key) => key,
            Err(err) => {
                debug!(error = %err, "Permalink requested for an invalid post");
                return String::new();
            }
        };

        let resolved = self.cache.get(&key, |_| {
            self.repo
                .permalink(&post, leave_name)?
                .map(|url| strip_scheme(&url).to_string())
                .ok_or(RepoError::NotFound)
        });

        match resolved {
            Ok(permalink) => permalink,
            Err(RepoError::NotFound) => {
                debug!(key, result = "unresolved", "Host has no permalink for post");
                String::new()
            }
            Err(err) => {
                warn!(key, error = %err, result = "degraded", "Permalink could not be resolved");
                String::new()
            }
        }
    }

    pub fn clear_post_cache(&self, post_id: u64) -> bool {
        self.cache.invalidate(&post_id.to_string())
    }
}

impl LifecycleObserver for PermalinkCache {
    fn name(&self) -> &'static str {
        "permalink_cache"
    }

    fn on_event(&self, event: &CacheEvent) {
        if let EventKind::PostSaved { post_id } = event.kind {
            let removed = self.clear_post_cache(post_id);
            debug!(observer = self.name(), post_id, removed, "Permalink cleared");
        }
    }
}

/// `scheme://rest` becomes `//rest`, cutting at the last `://` that still
/// has something after it. A value spanning several lines, or without such
/// a separator, is returned unchanged. One trailing newline is dropped from
/// a stripped value.
pub fn strip_scheme(url: &str) -> &str {
    let line = url.strip_suffix('\n').unwrap_or(url);
    if line.contains('\n') {
        return url;
    }
    line.rmatch_indices("://")
        .map(|(colon, _)| colon)
        .find(|&colon| line.len() > colon + "://".len())
        .map_or(url, |colon| &line[colon + 1..])
}
