use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::DashboardOrchestrator`].
#[derive(Metrics, Clone)]
#[metrics(scope = "dashboard_orchestrator")]
pub(crate) struct OrchestratorMetrics {
    /// A counter on the completed refresh cycles.
    pub refresh_cycles: Counter,
    /// A counter on the refreshes skipped because another one was in flight.
    pub skipped_refreshes: Counter,
    /// A counter on the fetches that fell back to defaults.
    pub degraded_fetches: Counter,
    /// A histogram of the refresh cycle duration in seconds.
    pub refresh_duration: Histogram,
}
