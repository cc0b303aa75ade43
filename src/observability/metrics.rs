//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define client metrics (requests, refresh cycles, logouts)
//! - Install a Prometheus recorder when enabled
//!
//! # Metrics
//! - `client_requests_total` (counter): requests by method, outcome
//! - `client_request_duration_seconds` (histogram): latency distribution
//! - `client_refresh_total` (counter): refresh calls by outcome
//! - `client_refresh_pending` (gauge): requests waiting on the in-flight refresh
//! - `client_logouts_total` (counter): hard logouts by reason
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Record a finished request.
pub fn record_request(method: &str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "client_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("client_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a settled refresh-protocol call.
pub fn record_refresh(outcome: &'static str) {
    ::metrics::counter!("client_refresh_total", "outcome" => outcome).increment(1);
}

/// Number of requests waiting on the in-flight refresh.
pub fn record_refresh_pending(pending: usize) {
    ::metrics::gauge!("client_refresh_pending").set(pending as f64);
}

/// Record a hard logout.
pub fn record_logout(reason: &'static str) {
    ::metrics::counter!("client_logouts_total", "reason" => reason).increment(1);
}
