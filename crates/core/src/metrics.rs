//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline (requests by outcome, turn waits, malformed records)
//! - Culture cache (lookups, loads)

use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Requests finished, by outcome.
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cultureconv_requests_total", "Total conversion requests finished"),
        &["outcome"], // "converted", "failed", "aborted"
    )
    .unwrap()
});

/// Streaming lines rejected before entering the pipeline.
pub static MALFORMED_RECORDS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cultureconv_malformed_records_total",
        "Total streaming records rejected as malformed",
    )
    .unwrap()
});

/// Time a request spent waiting for its turn after its culture resolved.
pub static TURN_WAIT_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "cultureconv_turn_wait_seconds",
            "Time spent waiting for earlier tickets to complete",
        )
        .buckets(vec![0.0001, 0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Culture Cache Metrics
// =============================================================================

/// Cache lookups, by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cultureconv_culture_cache_lookups_total", "Total culture cache lookups"),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Loader invocations, by result.
pub static CULTURE_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cultureconv_culture_loads_total", "Total culture loader invocations"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REQUESTS_TOTAL.clone()),
        Box::new(MALFORMED_RECORDS.clone()),
        Box::new(TURN_WAIT_DURATION.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CULTURE_LOADS.clone()),
    ]
}

/// Registers every core metric in `registry`.
pub fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    for metric in all_metrics() {
        registry.register(metric)?;
    }
    Ok(())
}

/// Encodes the registry in the Prometheus text exposition format.
pub fn encode_metrics(registry: &Registry) -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
