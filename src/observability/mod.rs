//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client.rs / refresh coordinator / logout signal produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → Prometheus text snapshot (CLI --metrics)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event of a request and its retry
//! - Metrics are cheap (no-op without a recorder)

pub mod logging;
pub mod metrics;
