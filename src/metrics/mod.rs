// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    INFERENCE_CALLS,
    INFERENCE_DURATION,
    UPLOAD_BYTES,
    STAGING_CLEANUP_FAILURES,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();

    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record an outbound workflow call
pub fn record_inference_call(outcome: &str, duration_secs: f64) {
    INFERENCE_CALLS.with_label_values(&[outcome]).inc();
    INFERENCE_DURATION.observe(duration_secs);
}

pub fn record_upload_size(bytes: u64) {
    UPLOAD_BYTES.observe(bytes as f64);
}

pub fn record_cleanup_failure() {
    STAGING_CLEANUP_FAILURES.inc();
}
