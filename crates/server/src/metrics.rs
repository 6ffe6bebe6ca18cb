//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the CineVault server:
//! - HTTP request metrics (latency, counts)
//! - Stored catalogue size (collected dynamically)
//! - Core ingestion and external service metrics (registered from core)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinevault_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinevault_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cinevault_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Store Metrics (collected dynamically)
// =============================================================================

/// Stored rows by entity.
pub static STORED_ENTITIES: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("cinevault_stored_entities", "Stored rows by entity"),
        &["entity"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Store
    registry
        .register(Box::new(STORED_ENTITIES.clone()))
        .unwrap();

    // Core metrics (ingestion, external services)
    for metric in cinevault_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Refresh gauges from the content store before encoding.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.store().stats() {
        for (entity, count) in [
            ("content", stats.content),
            ("genre", stats.genres),
            ("country", stats.countries),
            ("person", stats.persons),
            ("season", stats.seasons),
            ("episode", stats.episodes),
        ] {
            STORED_ENTITIES
                .with_label_values(&[entity])
                .set(count as i64);
        }
    }
}

/// Normalize a path for metric labels (replace numeric ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    // Replace twice: adjacent ids share the separating slash.
    let result = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");
    NUMERIC_SEGMENT.replace_all(&result, "/{id}$1").to_string()
}
