//! Prometheus metrics for the dashboard
//!
//! Registered once in the default registry; [`DashboardMetrics`] is a cheap
//! handle that any number of request handlers can clone.

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;

/// Histogram buckets for whole-pipeline fetch latency (in seconds)
const FETCH_LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    fetch_latency_seconds: Histogram,
    fetch_errors_total: IntCounter,
    empty_results_total: IntCounter,
    last_fetch_timestamp: IntGauge,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            fetch_latency_seconds: register_histogram!(
                "ecs_dashboard_fetch_latency_seconds",
                "Time spent running one cluster aggregation pipeline",
                FETCH_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fetch_latency_seconds"),

            fetch_errors_total: register_int_counter!(
                "ecs_dashboard_fetch_errors_total",
                "Aggregation runs that failed on a control-plane call or correlation fault"
            )
            .expect("Failed to register fetch_errors_total"),

            empty_results_total: register_int_counter!(
                "ecs_dashboard_empty_results_total",
                "Aggregation runs that found no instances or no tasks"
            )
            .expect("Failed to register empty_results_total"),

            last_fetch_timestamp: register_int_gauge!(
                "ecs_dashboard_last_fetch_timestamp",
                "Unix timestamp of the last successful fetch"
            )
            .expect("Failed to register last_fetch_timestamp"),
        }
    }
}

/// Handle to the global dashboard metrics
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    /// Create a metrics handle (registers the global metrics on first call)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record the duration of one aggregation run
    pub fn observe_fetch_latency(&self, duration_secs: f64) {
        self.inner().fetch_latency_seconds.observe(duration_secs);
    }

    /// Count a failed aggregation run
    pub fn record_fetch_error(&self) {
        self.inner().fetch_errors_total.inc();
    }

    /// Count a run that found an idle cluster
    pub fn record_empty_result(&self) {
        self.inner().empty_results_total.inc();
    }

    /// Mark the time of the last successful fetch
    pub fn set_last_fetch_timestamp(&self, unix_secs: i64) {
        self.inner().last_fetch_timestamp.set(unix_secs);
    }
}
