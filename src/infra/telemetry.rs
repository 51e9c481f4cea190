use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Fails when a global subscriber is already installed.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every metric the caches emit.
///
/// Called by [`init`]; hosts that install their own subscriber call it
/// directly. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "stashline_cache_hit_total",
            Unit::Count,
            "Total number of read-through cache hits."
        );
        describe_counter!(
            "stashline_cache_miss_total",
            Unit::Count,
            "Total number of read-through cache misses."
        );
        describe_counter!(
            "stashline_cache_store_skipped_total",
            Unit::Count,
            "Total number of produced values not stored because they were not cacheable."
        );
        describe_counter!(
            "stashline_cache_store_error_total",
            Unit::Count,
            "Total number of backing store operations that failed."
        );
        describe_counter!(
            "stashline_cache_invalidate_total",
            Unit::Count,
            "Total number of cache invalidations."
        );
        describe_counter!(
            "stashline_store_evict_total",
            Unit::Count,
            "Total number of in-memory store evictions due to capacity."
        );
        describe_gauge!(
            "stashline_event_queue_len",
            Unit::Count,
            "Current number of pending lifecycle events in the queue."
        );
        describe_counter!(
            "stashline_event_dropped_total",
            Unit::Count,
            "Total number of lifecycle events dropped due to queue overflow."
        );
        describe_histogram!(
            "stashline_consume_ms",
            Unit::Milliseconds,
            "Lifecycle event consumption latency in milliseconds."
        );
    });
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn describe_metrics_is_idempotent() {
        describe_metrics();
        describe_metrics();
    }

    #[test]
    fn second_init_reports_an_error() {
        let logging = LoggingSettings {
            level: LevelFilter::WARN,
            format: LogFormat::Compact,
        };

        let _ = init(&logging);
        assert!(matches!(init(&logging), Err(InfraError::Telemetry(_))));
    }
}
