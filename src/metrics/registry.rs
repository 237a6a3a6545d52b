// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry, register_int_counter_with_registry, CounterVec, Encoder,
    Histogram, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of relay requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("relay_requests_total", "Total number of relay requests"),
        &["endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("relay_request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // INFERENCE API METRICS
    // ============================================================================

    /// Outbound workflow calls by outcome
    pub static ref INFERENCE_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("inference_calls_total", "Total inference workflow calls"),
        &["outcome"], // outcome: success, upstream_error, transport_error
        REGISTRY
    ).unwrap();

    /// Outbound workflow call duration
    pub static ref INFERENCE_DURATION: Histogram = register_histogram_with_registry!(
        HistogramOpts::new("inference_call_duration_seconds", "Inference workflow call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        REGISTRY
    ).unwrap();

    // ============================================================================
    // STAGING METRICS
    // ============================================================================

    /// Size of staged uploads
    pub static ref UPLOAD_BYTES: Histogram = register_histogram_with_registry!(
        HistogramOpts::new("upload_bytes", "Size of staged image uploads in bytes")
            .buckets(prometheus::exponential_buckets(16_384.0, 4.0, 7).unwrap()),
        REGISTRY
    ).unwrap();

    /// Staged files that could not be removed explicitly
    pub static ref STAGING_CLEANUP_FAILURES: IntCounter = register_int_counter_with_registry!(
        Opts::new("staging_cleanup_failures_total", "Staged uploads that failed to delete"),
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
