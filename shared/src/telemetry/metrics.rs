//! Process-wide Prometheus registry backing the observability envelope.
//!
//! Grounded in `Plawn-r2e`'s `r2e-prometheus` crate: a single
//! `prometheus::Registry` holding one `CounterVec` and one `HistogramVec`,
//! both labeled exactly `(method, status)` per spec §4.1. Registration
//! happens once, in `MetricsRegistry::new`, per the §9 redesign flag
//! ("centralize in a registry component to avoid double-registration under
//! testing; expose a test hook that returns a fresh registry").

use std::time::Duration;

use prometheus::{CounterVec, HistogramVec, Opts, Registry};

/// Owns the counter/histogram pair every `Envelope` writes into.
///
/// Cloning is cheap: `CounterVec`/`HistogramVec` are internally `Arc`-backed.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    calls_total: CounterVec,
    duration_seconds: HistogramVec,
}

impl MetricsRegistry {
    /// Builds a fresh registry and registers both metric families.
    ///
    /// Call exactly once per process (held behind an `Arc`/`OnceCell` by the
    /// composition root); use [`Self::new_for_test`] in unit tests so each
    /// test gets its own `Registry` and double-registration never fires.
    pub fn new() -> Self {
        let registry = Registry::new();
        let calls_total = CounterVec::new(
            Opts::new(
                "service_method_calls_total",
                "Total service-method invocations by method and terminal status",
            ),
            &["method", "status"],
        )
        .expect("static metric descriptor");
        let duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "service_method_duration_seconds",
                "Service-method latency by method and terminal status",
            ),
            &["method", "status"],
        )
        .expect("static metric descriptor");

        registry
            .register(Box::new(calls_total.clone()))
            .expect("first registration of calls_total");
        registry
            .register(Box::new(duration_seconds.clone()))
            .expect("first registration of duration_seconds");

        Self {
            registry,
            calls_total,
            duration_seconds,
        }
    }

    /// A registry scoped to a single test, never shared with process-wide state.
    pub fn new_for_test() -> Self {
        Self::new()
    }

    /// Records one sample for `(method, status)`: increments the counter and
    /// observes the elapsed latency in the histogram.
    pub fn observe(&self, method: &str, status: &str, elapsed: Duration) {
        self.calls_total.with_label_values(&[method, status]).inc();
        self.duration_seconds
            .with_label_values(&[method, status])
            .observe(elapsed.as_secs_f64());
    }

    /// Current sample count for `(method, status)`. Test-only helper.
    pub fn sample_count(&self, method: &str, status: &str) -> u64 {
        self.calls_total.with_label_values(&[method, status]).get() as u64
    }

    /// The underlying registry, for wiring a scrape endpoint (out of scope
    /// here; exposed so the composition root can do it).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_increments_labeled_counter() {
        let metrics = MetricsRegistry::new_for_test();
        metrics.observe("FindById", "success", Duration::from_millis(5));
        metrics.observe("FindById", "success", Duration::from_millis(5));
        assert_eq!(metrics.sample_count("FindById", "success"), 2);
        assert_eq!(metrics.sample_count("FindById", "not_found_error_FindById"), 0);
    }
}
