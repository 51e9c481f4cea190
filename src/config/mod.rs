//! Configuration layer: typed settings with layered precedence (file → env).

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "stashline";
const ENV_PREFIX: &str = "STASHLINE";
const DEFAULT_TTL_SECONDS: u64 = 86_400;
const DEFAULT_STORE_CAPACITY: usize = 4_096;
const DEFAULT_CONSUME_BATCH_LIMIT: usize = 100;
const DEFAULT_EVENT_QUEUE_LIMIT: usize = 1_024;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// When false, lifecycle triggers publish nothing.
    pub enabled: bool,
    pub default_ttl: Duration,
    /// Entries kept by the in-memory store before LRU eviction.
    pub store_capacity: NonZeroUsize,
    pub consume_batch_limit: NonZeroUsize,
    pub event_queue_limit: NonZeroUsize,
    /// Per-namespace overrides, keyed by namespace.
    pub namespaces: BTreeMap<String, NamespaceSettings>,
}

impl CacheSettings {
    /// TTL for `namespace`: its override if any, the default otherwise.
    pub fn ttl_for(&self, namespace: &str) -> Duration {
        self.namespaces
            .get(namespace)
            .map_or(self.default_ttl, |settings| settings.ttl)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            store_capacity: non_zero(DEFAULT_STORE_CAPACITY),
            consume_batch_limit: non_zero(DEFAULT_CONSUME_BATCH_LIMIT),
            event_queue_limit: non_zero(DEFAULT_EVENT_QUEUE_LIMIT),
            namespaces: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSettings {
    /// Zero disables expiry.
    pub ttl: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl LoadError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence: `config/default`, then
/// `stashline` (both optional), then `config_file` (required when given),
/// then `STASHLINE__*` environment variables.
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, cache } = raw;

        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;

        Ok(Self { logging, cache })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let default_ttl =
        Duration::from_secs(cache.default_ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS));

    let store_capacity = non_zero_setting(
        "cache.store_capacity",
        cache.store_capacity,
        DEFAULT_STORE_CAPACITY,
    )?;
    let consume_batch_limit = non_zero_setting(
        "cache.consume_batch_limit",
        cache.consume_batch_limit,
        DEFAULT_CONSUME_BATCH_LIMIT,
    )?;
    let event_queue_limit = non_zero_setting(
        "cache.event_queue_limit",
        cache.event_queue_limit,
        DEFAULT_EVENT_QUEUE_LIMIT,
    )?;

    let mut namespaces = BTreeMap::new();
    for (name, raw) in cache.namespaces {
        if name.trim().is_empty() {
            return Err(LoadError::invalid(
                "cache.namespaces",
                "namespace names must not be empty",
            ));
        }
        let ttl = raw.ttl_seconds.map_or(default_ttl, Duration::from_secs);
        namespaces.insert(name, NamespaceSettings { ttl });
    }

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        default_ttl,
        store_capacity,
        consume_batch_limit,
        event_queue_limit,
        namespaces,
    })
}

fn non_zero_setting(
    key: &'static str,
    value: Option<usize>,
    default: usize,
) -> Result<NonZeroUsize, LoadError> {
    let value = value.unwrap_or(default);
    NonZeroUsize::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => NonZeroUsize::MIN,
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    default_ttl_seconds: Option<u64>,
    store_capacity: Option<usize>,
    consume_batch_limit: Option<usize>,
    event_queue_limit: Option<usize>,
    namespaces: BTreeMap<String, RawNamespaceSettings>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawNamespaceSettings {
    ttl_seconds: Option<u64>,
}

#[cfg(test)]
mod tests;
