use std::collections::BTreeMap;
use std::fmt;

/// Extra HTML attributes forwarded to the host's image tag builder.
pub type ImageAttrs = BTreeMap<String, String>;

/// A registered image size name, or explicit dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Named(String),
    Dimensions { width: u32, height: u32 },
}

impl ImageSize {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Identifier of the size inside a post's cached tag map: the name, or
    /// `WxH`.
    pub fn size_id(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Dimensions { width, height } => format!("{width}x{height}"),
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.size_id())
    }
}
