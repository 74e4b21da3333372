use crate::{AggregateStats, RollupSummary};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr};

/// A data availability network tracked by the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// The production network.
    #[display("mainnet")]
    Mainnet,
    /// The public test network.
    #[display("testnet")]
    Testnet,
}

impl Network {
    /// All tracked networks.
    pub const ALL: [Self; 2] = [Self::Mainnet, Self::Testnet];

    /// Returns the network name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mainnet") {
            Ok(Self::Mainnet)
        } else if s.eq_ignore_ascii_case("testnet") {
            Ok(Self::Testnet)
        } else {
            Err(format!("Expected 'mainnet' or 'testnet', got '{s}'"))
        }
    }
}

/// Counts of degraded data within one [`NetworkCache`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NetworkHealth {
    /// The number of fetches that fell back to defaults.
    pub degraded_fetches: usize,
    /// Whether the network-wide aggregate fell back to defaults.
    pub global_fallback: bool,
}

impl NetworkHealth {
    /// Returns true if every fetch of the cycle succeeded.
    pub const fn is_healthy(&self) -> bool {
        self.degraded_fetches == 0
    }
}

/// Everything the dashboard knows about one network, assembled by a single refresh cycle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NetworkCache {
    /// The configured rollups with their submitted size, in configuration order.
    pub rollups: Vec<RollupSummary>,
    /// The aggregate stats per application id.
    pub stats: HashMap<String, AggregateStats>,
    /// The network-wide aggregate stats.
    pub global_stats: AggregateStats,
    /// The degraded data within this cache.
    pub health: NetworkHealth,
}

impl NetworkCache {
    /// Returns the rollups whose name or application id contains `query` (case-insensitive),
    /// largest total size first.
    pub fn filtered_rollups(&self, query: &str) -> Vec<&RollupSummary> {
        let query = query.trim().to_lowercase();
        let mut rollups = self
            .rollups
            .iter()
            .filter(|rollup| {
                rollup.config.name.to_lowercase().contains(&query) ||
                    rollup.config.app_id.to_lowercase().contains(&query)
            })
            .collect::<Vec<_>>();

        rollups.sort_by_key(|rollup| std::cmp::Reverse(self.total_bytes(&rollup.config.app_id)));
        rollups
    }

    /// Returns the totals to display for the network.
    ///
    /// The network-wide aggregate is preferred. When it fell back to defaults, the per-rollup
    /// stats are summed instead, if there are any.
    pub fn network_totals(&self) -> AggregateStats {
        if self.health.global_fallback && !self.stats.is_empty() {
            return AggregateStats::sum(self.stats.values());
        }
        self.global_stats.clone()
    }

    fn total_bytes(&self, app_id: &str) -> u128 {
        self.stats.get(app_id).map(|stats| stats.total_bytes).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RollupConfig;

    fn cache() -> NetworkCache {
        let rollups = [("Sophon", "17", 1024), ("Rooch", "20", 4096), ("Skate", "19", 2048)];
        NetworkCache {
            rollups: rollups
                .iter()
                .map(|(name, id, _)| RollupSummary::new(RollupConfig::new(*name, *id, "5Addr"), 0))
                .collect(),
            stats: rollups
                .iter()
                .map(|(_, id, bytes)| (id.to_string(), AggregateStats::from_totals(1, *bytes, 1.0)))
                .collect(),
            global_stats: AggregateStats::from_totals(10, 10_000, 10.0),
            health: NetworkHealth::default(),
        }
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }

    #[test]
    fn test_filtered_rollups_sorted_by_size() {
        let cache = cache();
        let names =
            cache.filtered_rollups("").iter().map(|r| r.config.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Rooch", "Skate", "Sophon"]);

        let by_name = cache.filtered_rollups("SOPH");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].config.app_id, "17");

        let by_id = cache.filtered_rollups("2");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].config.name, "Rooch");
    }

    #[test]
    fn test_network_totals_falls_back_to_rollup_sum() {
        let mut cache = cache();
        assert_eq!(cache.network_totals().total_submissions, 10);

        cache.global_stats = AggregateStats::zero();
        cache.health.global_fallback = true;
        let totals = cache.network_totals();
        assert_eq!(totals.total_submissions, 3);
        assert_eq!(totals.total_bytes, 7168);
        assert_eq!(totals.total_cost, "3.00 AVAIL");
    }
}
