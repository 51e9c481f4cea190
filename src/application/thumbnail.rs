//! Cached post thumbnail tags.
//!
//! Entries are keyed by post id and hold every size rendered so far, so a
//! post saved once invalidates all of its sizes at once.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::repos::{MediaRepo, RepoError};
use crate::cache::{
    CacheBackend, CacheConfig, CacheEvent, EventKind, LifecycleObserver, ReadThroughCache,
};
use crate::domain::entities::PostRecord;
use crate::domain::media::{ImageAttrs, ImageSize};
use crate::domain::post_ref::PostRef;

/// Size id to rendered tag.
pub type ThumbnailTags = BTreeMap<String, String>;

pub struct ThumbnailCache {
    repo: Arc<dyn MediaRepo>,
    cache: ReadThroughCache<ThumbnailTags>,
}

impl ThumbnailCache {
    pub fn new(config: CacheConfig, backend: Arc<dyn CacheBackend>, repo: Arc<dyn MediaRepo>) -> Self {
        Self {
            repo,
            cache: ReadThroughCache::new(config, backend),
        }
    }

    /// The `<img>` tag of `post`'s thumbnail at `size`.
    ///
    /// Attachments render themselves; other posts render their featured
    /// image, or the attachment behind `fallback` when they have none. An
    /// empty string means there is nothing to show and nothing is cached.
    pub fn tag(
        &self,
        post: impl Into<PostRef>,
        size: &ImageSize,
        fallback: Option<&str>,
        attrs: &ImageAttrs,
    ) -> Result<String, RepoError> {
        let post = post.into();
        let key = match post.cache_key() {
            Ok(key) => key,
            Err(err) => {
                debug!(error = %err, "Thumbnail requested for an invalid post");
                return Ok(String::new());
            }
        };
        let size_id = size.size_id();

        let mut tags = self.cache.lookup(&key).unwrap_or_default();
        if let Some(tag) = tags.get(&size_id) {
            return Ok(tag.clone());
        }

        let Some(attachment_id) = self.attachment_for(&post, fallback)? else {
            return Ok(String::new());
        };

        let tag = self.repo.attachment_tag(attachment_id, size, attrs)?;
        if tag.is_empty() {
            debug!(key, size = %size_id, attachment_id, "Attachment rendered no tag");
            return Ok(tag);
        }

        tags.insert(size_id, tag.clone());
        self.cache.store(&key, &tags);
        Ok(tag)
    }

    /// Like [`ThumbnailCache::tag`], logging host failures and returning an
    /// empty string instead.
    pub fn tag_or_empty(
        &self,
        post: impl Into<PostRef>,
        size: &ImageSize,
        fallback: Option<&str>,
        attrs: &ImageAttrs,
    ) -> String {
        self.tag(post, size, fallback, attrs).unwrap_or_else(|err| {
            warn!(error = %err, result = "degraded", "Thumbnail tag could not be rendered");
            String::new()
        })
    }

    pub fn clear_post_cache(&self, post_id: u64) -> bool {
        self.cache.invalidate(&post_id.to_string())
    }

    fn attachment_for(
        &self,
        post: &PostRef,
        fallback: Option<&str>,
    ) -> Result<Option<u64>, RepoError> {
        let record = match post.record() {
            Some(record) => Some(record.clone()),
            None => match post.id() {
                Ok(post_id) => self.repo.post(post_id)?,
                Err(_) => None,
            },
        };

        if let Some(attachment_id) = self.own_attachment(record.as_ref())? {
            return Ok(Some(attachment_id));
        }

        match fallback.filter(|url| !url.is_empty()) {
            Some(url) => self.repo.attachment_id_for_url(url),
            None => Ok(None),
        }
    }

    fn own_attachment(&self, record: Option<&PostRecord>) -> Result<Option<u64>, RepoError> {
        match record {
            Some(record) if record.is_attachment() => Ok(Some(record.id)),
            Some(record) => self.repo.thumbnail_id(record),
            None => Ok(None),
        }
    }
}

impl LifecycleObserver for ThumbnailCache {
    fn name(&self) -> &'static str {
        "thumbnail_cache"
    }

    fn on_event(&self, event: &CacheEvent) {
        if let EventKind::PostSaved { post_id } = event.kind {
            let removed = self.clear_post_cache(post_id);
            debug!(observer = self.name(), post_id, removed, "Thumbnail tags cleared");
        }
    }
}
