//! Metrics collection and exposition.
//!
//! # Metrics
//! - `param_binder_requests_total` (counter): requests by endpoint and
//!   binding outcome (`ok`, `missing`, `invalid_format`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::binding::BindError;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one request and how its binding ended.
pub fn record_binding<T>(endpoint: &'static str, result: &Result<T, BindError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    ::metrics::counter!(
        "param_binder_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
}
