//! Cached, fail-soft access to aggregate stats and per-rollup submitted sizes.

use crate::{Clock, Indexers, ProviderError, TtlCache};
use futures::future::join_all;
use rollups_primitives::{
    parse_app_id, AggregateStats, Network, RollupConfig, RollupSummary, Sourced,
};
use std::{sync::Arc, time::Duration};

/// Fetches aggregate stats and rollup sizes from the indexers.
///
/// Every operation is infallible: upstream failures yield zeroed values tagged as
/// [`Origin::Fallback`](rollups_primitives::Origin::Fallback), which are never cached.
#[derive(Debug)]
pub struct StatsFetcher {
    indexers: Indexers,
    stats: TtlCache<String, AggregateStats>,
    sizes: TtlCache<String, u128>,
}

impl StatsFetcher {
    /// Returns a new [`StatsFetcher`] whose cached values live for `ttl`.
    pub fn new(indexers: Indexers, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            indexers,
            stats: TtlCache::new(ttl, clock.clone()),
            sizes: TtlCache::new(ttl, clock),
        }
    }

    /// Returns the aggregate stats of the network, or of one application if `app_id` is set.
    pub async fn aggregate_stats(
        &self,
        network: Network,
        app_id: Option<&str>,
    ) -> Sourced<AggregateStats> {
        let key = match app_id {
            Some(app_id) => format!("total-stats-{network}-{app_id}"),
            None => format!("total-stats-{network}"),
        };
        if let Some(stats) = self.stats.get(&key) {
            tracing::trace!(target: "rollups::providers", %key, "stats cache hit");
            return Sourced::cached(stats);
        }

        let result = match app_id.map(|id| parse_app_id(id).ok_or(id)) {
            Some(Err(id)) => Err(ProviderError::InvalidAppId(id.to_string())),
            Some(Ok(id)) => self.indexers.get(network).aggregate_stats(Some(id)).await,
            None => self.indexers.get(network).aggregate_stats(None).await,
        };

        match result {
            Ok(aggregate) => {
                let stats = AggregateStats::from_totals(
                    aggregate.distinct_submissions,
                    aggregate.byte_size,
                    aggregate.fees,
                );
                self.stats.insert(key, stats.clone());
                Sourced::fetched(stats)
            }
            Err(err) => {
                tracing::warn!(target: "rollups::providers", ?err, %key, "failed to fetch aggregate stats");
                Sourced::fallback(AggregateStats::zero())
            }
        }
    }

    /// Returns the rollup along with the blob size its signer submitted under its application id.
    pub async fn rollup_summary(
        &self,
        network: Network,
        rollup: &RollupConfig,
    ) -> Sourced<RollupSummary> {
        let key = format!("{network}-{}-{}", rollup.app_id, rollup.address);
        if let Some(bytes) = self.sizes.get(&key) {
            tracing::trace!(target: "rollups::providers", %key, "size cache hit");
            return Sourced::cached(RollupSummary::new(rollup.clone(), bytes));
        }

        let result = match rollup.numeric_app_id() {
            Some(app_id) => {
                self.indexers.get(network).signer_byte_size(app_id, &rollup.address).await
            }
            None => Err(ProviderError::InvalidAppId(rollup.app_id.clone())),
        };

        match result {
            Ok(bytes) => {
                self.sizes.insert(key, bytes);
                Sourced::fetched(RollupSummary::new(rollup.clone(), bytes))
            }
            Err(err) => {
                tracing::warn!(target: "rollups::providers", ?err, %key, rollup = %rollup.name, "failed to fetch rollup size");
                Sourced::fallback(RollupSummary::new(rollup.clone(), 0))
            }
        }
    }

    /// Returns the summaries of the rollups, in the provided order.
    ///
    /// The rollups are fetched concurrently and one failing rollup does not affect the others.
    pub async fn rollup_list(
        &self,
        network: Network,
        rollups: &[RollupConfig],
    ) -> Vec<Sourced<RollupSummary>> {
        join_all(rollups.iter().map(|rollup| self.rollup_summary(network, rollup))).await
    }

    /// Drops every cached value.
    pub fn clear(&self) {
        self.stats.clear();
        self.sizes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{ManualClock, MockIndexer},
        SubmissionAggregate,
    };
    use rollups_primitives::Origin;

    const TTL: Duration = Duration::from_secs(300);

    fn fetcher(mainnet: &MockIndexer, clock: &ManualClock) -> StatsFetcher {
        let indexers = Indexers::new(Arc::new(mainnet.clone()), Arc::new(MockIndexer::default()));
        StatsFetcher::new(indexers, TTL, Arc::new(clock.clone()))
    }

    fn aggregate(distinct: u64, bytes: u128, fees: f64) -> SubmissionAggregate {
        SubmissionAggregate {
            total_count: distinct,
            distinct_submissions: distinct,
            byte_size: bytes,
            fees,
        }
    }

    #[tokio::test]
    async fn test_aggregate_stats_are_cached() -> eyre::Result<()> {
        let indexer = MockIndexer::default().with_aggregate(None, aggregate(1234, 2048, 12.5));
        let clock = ManualClock::new();
        let fetcher = fetcher(&indexer, &clock);

        let stats = fetcher.aggregate_stats(Network::Mainnet, None).await;
        assert_eq!(stats.origin, Origin::Fetched);
        assert_eq!(stats.value.total_submissions, 1234);
        assert_eq!(stats.value.total_size, "2.00 KB");
        assert_eq!(stats.value.total_cost, "12.50 AVAIL");

        clock.advance(Duration::from_secs(60));
        let cached = fetcher.aggregate_stats(Network::Mainnet, None).await;
        assert_eq!(cached.origin, Origin::Cached);
        assert_eq!(cached.value, stats.value);
        assert_eq!(indexer.aggregate_calls(), 1);

        clock.advance(TTL);
        assert_eq!(fetcher.aggregate_stats(Network::Mainnet, None).await.origin, Origin::Fetched);
        assert_eq!(indexer.aggregate_calls(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_failure_is_zero_and_not_cached() -> eyre::Result<()> {
        let indexer = MockIndexer::default().with_aggregate(Some(17), aggregate(3, 10, 1.0));
        indexer.set_failing(true);
        let fetcher = fetcher(&indexer, &ManualClock::new());

        let stats = fetcher.aggregate_stats(Network::Mainnet, Some("17")).await;
        assert_eq!(stats, Sourced::fallback(AggregateStats::zero()));
        assert_eq!(stats.value.total_cost, "0 AVAIL");

        indexer.set_failing(false);
        let stats = fetcher.aggregate_stats(Network::Mainnet, Some("17")).await;
        assert_eq!(stats.origin, Origin::Fetched);
        assert_eq!(stats.value.total_submissions, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_app_id_makes_no_request() -> eyre::Result<()> {
        let indexer = MockIndexer::default();
        let fetcher = fetcher(&indexer, &ManualClock::new());

        let stats = fetcher.aggregate_stats(Network::Mainnet, Some("abc")).await;
        assert!(stats.is_fallback());

        let rollup = RollupConfig::new("X", "x", "5A");
        let summary = fetcher.rollup_summary(Network::Mainnet, &rollup).await;
        assert!(summary.is_fallback());
        assert_eq!(summary.value.blobs_submitted, "0 B");
        assert_eq!(indexer.aggregate_calls() + indexer.size_calls(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_rollup_list_isolates_failures() -> eyre::Result<()> {
        let rollups = vec![
            RollupConfig::new("Sophon", "17", "5Sophon"),
            RollupConfig::new("Rooch", "20", "5Rooch"),
            RollupConfig::new("Skate", "19", "5Skate"),
        ];
        let indexer = MockIndexer::default()
            .with_size(17, "5Sophon", 1536)
            .with_size(20, "5Rooch", 1024)
            .with_size(19, "5Skate", 512);
        indexer.fail_app_id(20);
        let fetcher = fetcher(&indexer, &ManualClock::new());

        let summaries = fetcher.rollup_list(Network::Mainnet, &rollups).await;
        let names = summaries.iter().map(|s| s.value.config.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Sophon", "Rooch", "Skate"]);
        assert_eq!(summaries[0].value.blobs_submitted, "1.50 KB");
        assert!(summaries[1].is_fallback());
        assert_eq!(summaries[1].value.blob_bytes, 0);
        assert_eq!(summaries[2].value.blobs_submitted, "512 B");

        let again = fetcher.rollup_list(Network::Mainnet, &rollups).await;
        assert_eq!(again[0].origin, Origin::Cached);
        assert_eq!(again[1].origin, Origin::Fallback);
        assert_eq!(indexer.size_calls(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_cache_keys_are_per_network() -> eyre::Result<()> {
        let mainnet = MockIndexer::default().with_aggregate(None, aggregate(1, 1, 1.0));
        let testnet = MockIndexer::default().with_aggregate(None, aggregate(2, 2, 2.0));
        let indexers = Indexers::new(Arc::new(mainnet.clone()), Arc::new(testnet.clone()));
        let fetcher = StatsFetcher::new(indexers, TTL, Arc::new(ManualClock::new()));

        let mainnet_stats = fetcher.aggregate_stats(Network::Mainnet, None).await;
        let testnet_stats = fetcher.aggregate_stats(Network::Testnet, None).await;
        assert_eq!(mainnet_stats.value.total_submissions, 1);
        assert_eq!(testnet_stats.value.total_submissions, 2);
        assert_eq!(mainnet.aggregate_calls() + testnet.aggregate_calls(), 2);

        fetcher.clear();
        fetcher.aggregate_stats(Network::Testnet, None).await;
        assert_eq!(testnet.aggregate_calls(), 2);

        Ok(())
    }
}
