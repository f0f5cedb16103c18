//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through dispatcher logs
//! - Metrics are cheap (no-op until an exporter is installed)

pub mod logging;
pub mod metrics;
