use rollups_providers::FetcherConfig;
use std::time::Duration;

/// The default period between two background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration of the [`DashboardOrchestrator`](crate::DashboardOrchestrator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// The period between two background refreshes. The first one fires one period after the
    /// initial load completed.
    pub refresh_interval: Duration,
    /// The configuration of the fetchers.
    pub fetchers: FetcherConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { refresh_interval: DEFAULT_REFRESH_INTERVAL, fetchers: FetcherConfig::default() }
    }
}
