//! Per-request access log.

use std::time::Duration;

use http::{Method, StatusCode};
use tracing::{info, warn};

/// Logs one finished request. Server errors are logged at `warn`.
pub fn record(method: &Method, path: &str, status: StatusCode, latency: Duration) {
    let latency_ms = latency.as_secs_f64() * 1000.0;
    if status.is_server_error() {
        warn!(%method, path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        info!(%method, path, status = status.as_u16(), latency_ms, "request");
    }
}
