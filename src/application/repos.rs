//! Traits describing the host APIs the caches fall back to.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::entities::{MenuItem, MenuTerm, PostRecord};
use crate::domain::media::{ImageAttrs, ImageSize};
use crate::domain::post_ref::PostRef;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("host error: {0}")]
    Host(String),
    #[error("resource not found")]
    NotFound,
}

impl RepoError {
    pub fn from_host(err: impl std::fmt::Display) -> Self {
        Self::Host(err.to_string())
    }
}

pub trait MenuRepo: Send + Sync {
    /// Ids of every registered navigation menu.
    fn menu_ids(&self) -> Result<Vec<u64>, RepoError>;

    /// Theme location name to menu id.
    fn menu_locations(&self) -> Result<BTreeMap<String, u64>, RepoError>;

    fn menu_object(&self, menu_id: u64) -> Result<Option<MenuTerm>, RepoError>;

    fn menu_items(&self, menu_id: u64) -> Result<Vec<MenuItem>, RepoError>;
}

pub trait MediaRepo: Send + Sync {
    fn post(&self, post_id: u64) -> Result<Option<PostRecord>, RepoError>;

    /// Attachment id of the post's featured image.
    fn thumbnail_id(&self, post: &PostRecord) -> Result<Option<u64>, RepoError>;

    fn attachment_id_for_url(&self, url: &str) -> Result<Option<u64>, RepoError>;

    /// Rendered `<img>` tag; empty when the attachment has no image.
    fn attachment_tag(
        &self,
        attachment_id: u64,
        size: &ImageSize,
        attrs: &ImageAttrs,
    ) -> Result<String, RepoError>;
}

pub trait PermalinkRepo: Send + Sync {
    /// The post's public URL; `None` when the host cannot resolve it.
    fn permalink(&self, post: &PostRef, leave_name: bool) -> Result<Option<String>, RepoError>;
}
