//! The shapes a caller may use to designate a post.

use crate::cache::CacheError;

use super::entities::PostRecord;

/// A post designated by id, by record, or by an untyped id string coming
/// from the host (query args, hook payloads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostRef {
    Id(u64),
    Post(PostRecord),
    Raw(String),
}

impl PostRef {
    /// The post id, or [`CacheError::InvalidKey`] when a raw value is not
    /// an integer id.
    pub fn id(&self) -> Result<u64, CacheError> {
        match self {
            Self::Id(id) => Ok(*id),
            Self::Post(post) => Ok(post.id),
            Self::Raw(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CacheError::invalid_key(format!("`{raw}` is neither a post nor a post id"))
            }),
        }
    }

    pub fn record(&self) -> Option<&PostRecord> {
        match self {
            Self::Post(post) => Some(post),
            Self::Id(_) | Self::Raw(_) => None,
        }
    }

    /// Cache key for this post: its decimal id.
    pub fn cache_key(&self) -> Result<String, CacheError> {
        self.id().map(|id| id.to_string())
    }
}

impl From<u64> for PostRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<PostRecord> for PostRef {
    fn from(post: PostRecord) -> Self {
        Self::Post(post)
    }
}

impl From<&PostRecord> for PostRef {
    fn from(post: &PostRecord) -> Self {
        Self::Post(post.clone())
    }
}

impl From<&str> for PostRef {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for PostRef {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}
