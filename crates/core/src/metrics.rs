//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (per-item results and duration)
//! - External services (TMDB, translation, image CDN)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Ingestion attempts total by content kind and result.
pub static INGEST_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinevault_ingest_attempts_total", "Total ingestion attempts"),
        &["kind", "result"], // result: "updated", "not_found", "failed"
    )
    .unwrap()
});

/// Ingestion duration in seconds.
pub static INGEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinevault_ingest_duration_seconds",
            "Duration of a single ingestion",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["kind"],
    )
    .unwrap()
});

/// Seasons and episodes written during series ingestion.
pub static EPISODES_UPSERTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinevault_episodes_upserted_total",
            "Seasons and episodes written by ingestion",
        ),
        &["entity"], // "season", "episode"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinevault_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Machine translations by outcome.
pub static TRANSLATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinevault_translations_total", "Machine translation calls"),
        &["status"], // "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record one external request outcome.
pub fn record_external(service: &str, operation: &str, success: bool) {
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, if success { "success" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingestion
        Box::new(INGEST_ATTEMPTS.clone()),
        Box::new(INGEST_DURATION.clone()),
        Box::new(EPISODES_UPSERTED.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        Box::new(TRANSLATIONS.clone()),
    ]
}
