//! Prometheus metrics for monitoring the wagering server.
//!
//! Metrics are exposed in Prometheus text format on `/metrics`.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts and duration by route and status
//! - **Wager Metrics**: Bets placed and bets rejected by error kind
//! - **Settlement Metrics**: Settlement attempts by outcome, prizes paid
//! - **Concurrency Metrics**: Lock conflicts surfaced to clients

use igaming::ErrorKind;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// The returned handle renders the current snapshot for the `/metrics` route.
///
/// # Errors
///
/// Fails if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Wager Metrics
// ============================================================================

/// Increment bets placed counter.
pub fn bets_placed_total() {
    metrics::counter!("bets_placed_total").increment(1);
}

/// Increment rejected bets counter.
pub fn bets_rejected_total(kind: ErrorKind) {
    metrics::counter!("bets_rejected_total", "kind" => kind.as_str()).increment(1);
}

// ============================================================================
// Settlement Metrics
// ============================================================================

/// Increment settlement attempts counter, labelled `settled` or the error kind.
pub fn settlements_total(outcome: &'static str) {
    metrics::counter!("settlements_total", "outcome" => outcome).increment(1);
}

/// Record the total prize amount paid by one settlement.
pub fn prizes_paid(amount: f64) {
    metrics::histogram!("settlement_prizes_paid").record(amount);
}

// ============================================================================
// Concurrency Metrics
// ============================================================================

/// Increment lock conflict counter.
pub fn concurrency_conflicts_total(operation: &'static str) {
    metrics::counter!("concurrency_conflicts_total", "operation" => operation).increment(1);
}
