//! Domain layer: the host content the caches speak about.

pub mod decorator;
pub mod entities;
pub mod error;
pub mod media;
pub mod post_ref;
