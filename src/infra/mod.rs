//! Runtime bootstrap.

use std::path::Path;

use crate::config::{Settings, load};

pub mod error;
pub mod telemetry;

use error::InfraError;

/// Load settings and install telemetry from them.
///
/// Hosts that manage their own subscriber call [`load`](crate::config::load) and
/// [`telemetry::describe_metrics`] instead.
pub fn bootstrap(config_file: Option<&Path>) -> Result<Settings, InfraError> {
    let settings = load(config_file)?;
    telemetry::init(&settings.logging)?;
    Ok(settings)
}
