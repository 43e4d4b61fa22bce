//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Both handlers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) flows through every log line via TraceLayer
//! - Metrics are cheap; with no recorder installed they are no-ops

pub mod logging;
pub mod metrics;
