//! Metrics collection and exposition.
//!
//! # Metrics
//! - `call_server_requests_total` (counter): requests by method, status
//! - `call_server_request_duration_seconds` (histogram): latency by method
//! - `call_server_upstream_errors_total` (counter): upstream failures by method, kind
//!
//! Recording is a no-op until a recorder is installed, so handlers record
//! unconditionally.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "call_server_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("call_server_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream call.
pub fn record_upstream_error(method: &str, kind: &'static str) {
    counter!(
        "call_server_upstream_errors_total",
        "method" => method.to_string(),
        "kind" => kind
    )
    .increment(1);
}
