//! Metrics collection and exposition.
//!
//! # Metrics
//! - `runtime_api_requests_total` (counter): requests by route, status
//! - `runtime_api_relay_total` (counter): relayed commands by outcome
//! - `runtime_api_relay_duration_seconds` (histogram): relay latency
//! - `runtime_api_relay_bytes` (histogram): response size
//! - `runtime_api_reload_signals_total` (counter): flag writes by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is only installed when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16) {
    counter!(
        "runtime_api_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_relay(outcome: &'static str, start: Instant, bytes: usize) {
    counter!("runtime_api_relay_total", "outcome" => outcome).increment(1);
    histogram!("runtime_api_relay_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
    if outcome == "ok" {
        histogram!("runtime_api_relay_bytes").record(bytes as f64);
    }
}

pub fn record_reload(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("runtime_api_reload_signals_total", "outcome" => outcome).increment(1);
}
