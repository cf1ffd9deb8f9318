//! # Telemetry
//!
//! Structured logging (`tracing_config`, unchanged from the teacher) plus
//! the Prometheus metrics registry (`metrics`) backing the observability
//! envelope (`crate::envelope`).

pub mod metrics;

pub use metrics::MetricsRegistry;
