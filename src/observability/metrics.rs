//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by method, outcome
//! - `router_dispatch_duration_seconds` (histogram): dispatch latency by outcome
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until an exporter is installed
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`
//! - The method label is bounded: extension methods are all recorded as `other`

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

/// Methods recorded under their own label.
const STANDARD_METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH", "HEAD", "CONNECT", "TRACE",
];

/// Label for any method outside `STANDARD_METHODS`.
const OTHER_METHOD: &str = "other";

/// Error type for metrics setup.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Prometheus exporter could not be installed.
    #[error("Failed to install Prometheus exporter on {address}: {source}")]
    Install {
        address: SocketAddr,
        source: BuildError,
    },
}

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|source| MetricsError::Install {
            address: addr,
            source,
        })?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(method: &Method, outcome: &'static str, start_time: Instant) {
    metrics::counter!(
        "router_dispatch_total",
        "method" => method_label(method),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Fixed label for `method`, so clients cannot mint new series.
fn method_label(method: &Method) -> &'static str {
    STANDARD_METHODS
        .iter()
        .copied()
        .find(|standard| standard.eq_ignore_ascii_case(method.as_str()))
        .unwrap_or(OTHER_METHOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_methods_keep_their_label() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::PATCH), "PATCH");
        assert_eq!(method_label(&Method::from_bytes(b"delete").unwrap()), "DELETE");
    }

    #[test]
    fn test_extension_methods_share_one_label() {
        for raw in ["PURGE", "X0", "PROPFIND"] {
            let method = Method::from_bytes(raw.as_bytes()).unwrap();
            assert_eq!(method_label(&method), "other", "{raw}");
        }
    }

    #[test]
    fn test_invented_methods_do_not_grow_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for i in 0..200 {
                let method = Method::from_bytes(format!("X{i}").as_bytes()).unwrap();
                record_dispatch(&method, "not_found", Instant::now());
            }
            record_dispatch(&Method::GET, "handled", Instant::now());
        });

        let rendered = handle.render();
        let series = rendered
            .lines()
            .filter(|line| line.starts_with("router_dispatch_total{"))
            .count();
        assert_eq!(series, 2);
        assert!(rendered.contains(r#"method="other""#));
    }
}
