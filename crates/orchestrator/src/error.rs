use rollups_providers::ProviderError;
use tokio::task::JoinError;

/// An error that occurred while driving the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The fetchers could not be built.
    #[error("failed to build fetchers: {0}")]
    Provider(#[from] ProviderError),
    /// The refresh task stopped before publishing the awaited state.
    #[error("the refresh task is not running")]
    Stopped,
    /// The refresh task panicked or was cancelled.
    #[error("refresh task failed: {0}")]
    Task(#[from] JoinError),
}
