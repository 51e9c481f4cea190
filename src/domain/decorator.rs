//! Typed wrapper around a host post.

use super::entities::PostRecord;
use super::error::DomainError;

/// A post known to be of a given type.
///
/// Construction checks the post type once; revisions of any type are let
/// through since hosts hand them over while previewing. Fields are reached
/// through explicit accessors or [`PostDecorator::post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDecorator {
    post: PostRecord,
}

impl PostDecorator {
    pub fn new(post: PostRecord, expected_type: &str) -> Result<Self, DomainError> {
        if post.post_type != expected_type && !post.is_revision() {
            return Err(DomainError::unexpected_post_type(
                expected_type,
                post.post_type,
            ));
        }
        Ok(Self { post })
    }

    pub fn post(&self) -> &PostRecord {
        &self.post
    }

    pub fn id(&self) -> u64 {
        self.post.id
    }

    pub fn title(&self) -> &str {
        &self.post.title
    }

    pub fn post_type(&self) -> &str {
        &self.post.post_type
    }

    pub fn into_inner(self) -> PostRecord {
        self.post
    }
}

impl AsRef<PostRecord> for PostDecorator {
    fn as_ref(&self) -> &PostRecord {
        &self.post
    }
}
