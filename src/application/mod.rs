//! Call-site caches over host content.

pub mod menu;
pub mod permalink;
pub mod repos;
pub mod thumbnail;

pub use menu::{MenuCache, MenuRequest, MenuResolution};
pub use permalink::PermalinkCache;
pub use repos::{MediaRepo, MenuRepo, PermalinkRepo, RepoError};
pub use thumbnail::{ThumbnailCache, ThumbnailTags};
