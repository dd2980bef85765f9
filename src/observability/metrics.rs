//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): HTTP requests by route, status
//! - `gate_request_duration_seconds` (histogram): HTTP latency by route
//! - `gate_node_attempts_total` (counter): single node attempts by operation, outcome
//! - `gate_dispatch_total` (counter): completed dispatches by operation, outcome
//! - `gate_dispatch_duration_seconds` (histogram): dispatch latency across all attempts
//! - `gate_confirmations_total` (counter): confirmation waits by outcome
//! - `gate_feed_published_total` (counter): hashes published by the confirmation feed

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "gate_requests_total",
        "route" => route.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gate_request_duration_seconds", "route" => route.to_owned())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_node_attempt(operation: &'static str, outcome: &'static str) {
    counter!("gate_node_attempts_total", "operation" => operation, "outcome" => outcome).increment(1);
}

pub fn record_dispatch(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!("gate_dispatch_total", "operation" => operation, "outcome" => outcome).increment(1);
    histogram!("gate_dispatch_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_confirmation(outcome: &'static str) {
    counter!("gate_confirmations_total", "outcome" => outcome).increment(1);
}

pub fn record_feed_published(delivered: usize) {
    counter!("gate_feed_published_total").increment(1);
    if delivered > 0 {
        counter!("gate_feed_delivered_total").increment(delivered as u64);
    }
}
