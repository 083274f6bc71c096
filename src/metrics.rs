//! Prometheus metrics for the proxy trust gate.
//!
//! Metrics are exposed via a dedicated HTTP listener when `METRICS_PORT` is
//! non-zero.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `proxy_gate_requests_forwarded_total` - Requests passed to the application
//! - `proxy_gate_requests_rejected_total` - Requests refused (label: reason)
//!
//! Recording functions are safe to call before (or without) installing the
//! exporter; the `metrics` facade discards values when no recorder is set.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

use crate::error::{AppError, AppResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_FORWARDED_TOTAL: &str = "proxy_gate_requests_forwarded_total";
    pub const REQUESTS_REJECTED_TOTAL: &str = "proxy_gate_requests_rejected_total";
}

/// Initialize the Prometheus metrics exporter on `metrics_addr`.
///
/// # Errors
///
/// Returns `AppError::MetricsError` if the exporter cannot be installed
/// (address in use, recorder already set).
pub fn init_metrics(metrics_addr: SocketAddr) -> AppResult<()> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| AppError::MetricsError(format!("Failed to install Prometheus exporter: {e}")))?;

    describe_counter!(
        names::REQUESTS_FORWARDED_TOTAL,
        "Total number of requests forwarded by the proxy trust gate"
    );
    describe_counter!(
        names::REQUESTS_REJECTED_TOTAL,
        "Total number of requests rejected by the proxy trust gate"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a request forwarded to the application.
pub fn record_forwarded() {
    counter!(names::REQUESTS_FORWARDED_TOTAL).increment(1);
}

/// Record a rejected request.
pub fn record_rejected(reason: &'static str) {
    counter!(names::REQUESTS_REJECTED_TOTAL, "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These only verify the functions don't panic without a recorder.

    #[test]
    fn test_record_forwarded() {
        record_forwarded();
    }

    #[test]
    fn test_record_rejected() {
        record_rejected("untrusted_origin");
        record_rejected("proxy_misconfigured");
    }
}
