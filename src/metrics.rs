//! Prometheus metrics for the users API.
//!
//! This module provides:
//! - Write counters (created, updated, deleted, rejected)
//! - HTTP request latency per endpoint
//! - Installation of the Prometheus recorder rendered at `/metrics`

use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Users created counter metric name.
pub const METRIC_USERS_CREATED: &str = "users_created_total";
/// Users updated counter metric name.
pub const METRIC_USERS_UPDATED: &str = "users_updated_total";
/// Users deleted counter metric name.
pub const METRIC_USERS_DELETED: &str = "users_deleted_total";
/// Rejected writes counter metric name.
pub const METRIC_WRITE_REJECTIONS: &str = "user_write_rejections_total";

/// Initialize all metric descriptions.
/// Call this once at startup, after installing a recorder.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_USERS_CREATED, "Total number of users created");
    describe_counter!(METRIC_USERS_UPDATED, "Total number of users updated");
    describe_counter!(METRIC_USERS_DELETED, "Total number of users deleted");
    describe_counter!(
        METRIC_WRITE_REJECTIONS,
        "Total number of rejected user writes, by reason"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Drain recorded histogram samples every `period`.
///
/// Samples otherwise accumulate until `/metrics` is scraped.
pub fn spawn_upkeep(handle: PrometheusHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Increment users created counter.
pub fn inc_users_created() {
    counter!(METRIC_USERS_CREATED).increment(1);
}

/// Increment users updated counter.
pub fn inc_users_updated() {
    counter!(METRIC_USERS_UPDATED).increment(1);
}

/// Increment users deleted counter.
pub fn inc_users_deleted() {
    counter!(METRIC_USERS_DELETED).increment(1);
}

/// Increment rejected writes counter.
pub fn inc_write_rejections(reason: &'static str) {
    counter!(METRIC_WRITE_REJECTIONS, "reason" => reason).increment(1);
}

/// RAII guard for timing a request.
/// Records latency under the endpoint label when dropped.
pub struct RequestTimer {
    start: Instant,
    endpoint: &'static str,
}

impl RequestTimer {
    /// Start timing a request to `endpoint`.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => self.endpoint)
            .record(self.elapsed_ms());
    }
}
