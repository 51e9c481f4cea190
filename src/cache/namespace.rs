//! Cache namespaces ("cache groups").

use std::fmt;

use super::error::CacheError;

/// A partition of the backing store owned by exactly one cache instance.
///
/// Two caches sharing a store must use different namespaces, otherwise their
/// keys collide (`"123"` is a permalink in one group and a thumbnail map in
/// another). Use something host-scoped such as `yourtheme.menus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Result<Self, CacheError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CacheError::configuration(
                "cache namespace must be set to a non-empty name",
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Namespace {
    type Error = CacheError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
