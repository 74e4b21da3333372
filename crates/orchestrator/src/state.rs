use chrono::{DateTime, Utc};
use rollups_primitives::{Network, NetworkCache, Origin};
use std::{sync::Arc, time::Duration};

/// The lifecycle phase of the dashboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The initial load has not completed yet.
    #[default]
    Initializing,
    /// The initial load completed. Terminal for the process lifetime.
    Ready,
}

/// What triggered a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// The eager load performed while initializing.
    Initial,
    /// A periodic refresh fired by the timer.
    Background,
    /// A refresh requested through the handle.
    Manual,
}

impl RefreshKind {
    /// Returns true if the refresh was not triggered by a consumer.
    pub const fn is_background(&self) -> bool {
        matches!(self, Self::Background)
    }
}

/// A snapshot of everything the dashboard displays.
///
/// Snapshots are replaced whole at the end of each refresh cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// The lifecycle phase.
    pub phase: Phase,
    /// The USD price of the native token, if one was ever fetched.
    pub avail_price: Option<f64>,
    /// The mainnet data.
    pub mainnet: Arc<NetworkCache>,
    /// The testnet data.
    pub testnet: Arc<NetworkCache>,
    /// Whether the snapshot was produced by a background refresh.
    pub is_background_update: bool,
    /// The number of completed refresh cycles.
    pub cycle: u64,
    /// When the last refresh cycle completed.
    pub last_refresh: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Returns true while the initial load is running.
    pub fn loading(&self) -> bool {
        self.phase == Phase::Initializing
    }

    /// Returns the data of the network.
    pub fn network(&self, network: Network) -> &NetworkCache {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }
}

/// The outcome of a completed refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// The cycle number.
    pub cycle: u64,
    /// What triggered the cycle.
    pub kind: RefreshKind,
    /// How long the cycle took.
    pub duration: Duration,
    /// Where the price came from.
    pub price_origin: Origin,
    /// The number of fetches that fell back to defaults, across both networks.
    pub degraded_fetches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_loading() {
        let state = DashboardState::default();
        assert!(state.loading());
        assert_eq!(state.avail_price, None);
        assert!(state.network(Network::Testnet).rollups.is_empty());

        let ready = DashboardState { phase: Phase::Ready, ..state };
        assert!(!ready.loading());
    }
}
