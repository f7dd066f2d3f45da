//! Prometheus Metrics Module
//!
//! Provides process-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Snowflake IDs generated
//! - Clock regressions absorbed by the generator
//! - Sequence wraps within a single millisecond
//! - Permission checks by outcome

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Total Snowflake IDs handed out
pub static SNOWFLAKES_GENERATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("snowflakes_generated_total", "Total number of Snowflake IDs generated")
            .namespace("chat_core"),
    )
    .expect("Failed to create SNOWFLAKES_GENERATED_TOTAL metric")
});

/// Calls that observed the wall clock behind the last used timestamp
pub static SNOWFLAKE_CLOCK_REGRESSIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "snowflake_clock_regressions_total",
            "Number of ID generations that observed the clock moving backwards",
        )
        .namespace("chat_core"),
    )
    .expect("Failed to create SNOWFLAKE_CLOCK_REGRESSIONS_TOTAL metric")
});

/// Sequence counter wraps inside a single millisecond
pub static SNOWFLAKE_SEQUENCE_WRAPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "snowflake_sequence_wraps_total",
            "Number of times the sequence wrapped within one millisecond",
        )
        .namespace("chat_core"),
    )
    .expect("Failed to create SNOWFLAKE_SEQUENCE_WRAPS_TOTAL metric")
});

/// Permission checks by outcome
pub static PERMISSION_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("permission_checks_total", "Total number of permission checks")
            .namespace("chat_core"),
        &["outcome"], // "allowed", "denied"
    )
    .expect("Failed to create PERMISSION_CHECKS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(SNOWFLAKES_GENERATED_TOTAL.clone()))
        .expect("Failed to register SNOWFLAKES_GENERATED_TOTAL");
    registry
        .register(Box::new(SNOWFLAKE_CLOCK_REGRESSIONS_TOTAL.clone()))
        .expect("Failed to register SNOWFLAKE_CLOCK_REGRESSIONS_TOTAL");
    registry
        .register(Box::new(SNOWFLAKE_SEQUENCE_WRAPS_TOTAL.clone()))
        .expect("Failed to register SNOWFLAKE_SEQUENCE_WRAPS_TOTAL");
    registry
        .register(Box::new(PERMISSION_CHECKS_TOTAL.clone()))
        .expect("Failed to register PERMISSION_CHECKS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

pub fn record_snowflake_generated() {
    SNOWFLAKES_GENERATED_TOTAL.inc();
}

pub fn record_clock_regression() {
    SNOWFLAKE_CLOCK_REGRESSIONS_TOTAL.inc();
}

pub fn record_sequence_wrap() {
    SNOWFLAKE_SEQUENCE_WRAPS_TOTAL.inc();
}

/// Helper to record a permission check outcome
pub fn record_permission_check(allowed: bool) {
    let outcome = if allowed { "allowed" } else { "denied" };
    PERMISSION_CHECKS_TOTAL.with_label_values(&[outcome]).inc();
}
