//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay requests by outcome and status
//! - `relay_request_duration_seconds` (histogram): relay latency
//! - `quote_requests_total` (counter): quote requests by fallback flag

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished relay request.
pub fn record_relay(outcome: &'static str, status: u16, started: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

/// Record one quote request.
pub fn record_quote(fallback: bool) {
    metrics::counter!("quote_requests_total", "fallback" => if fallback { "true" } else { "false" })
        .increment(1);
}
