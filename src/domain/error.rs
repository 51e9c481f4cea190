use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("the post should be of type `{expected}` (`{found}` found)")]
    UnexpectedPostType { expected: String, found: String },
}

impl DomainError {
    pub fn unexpected_post_type(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedPostType {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
