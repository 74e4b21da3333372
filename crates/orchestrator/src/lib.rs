//! The cache and refresh orchestrator of the rollups dashboard.
//!
//! The [`DashboardOrchestrator`] owns the fetchers, assembles one [`NetworkCache`] per network on
//! every refresh cycle and publishes the result as a [`DashboardState`] snapshot.

pub use config::{OrchestratorConfig, DEFAULT_REFRESH_INTERVAL};
mod config;

pub use error::OrchestratorError;
mod error;

pub use handle::OrchestratorHandle;
mod handle;

mod metrics;
use metrics::OrchestratorMetrics;

pub use state::{DashboardState, Phase, RefreshKind, RefreshReport};
mod state;

use futures::future::join_all;
use rollups_primitives::{
    DetailPage, DetailView, LoadMode, Network, NetworkCache, NetworkHealth, RollupConfig,
    RollupRegistry,
};
use rollups_providers::{
    http_client, CoinGeckoClient, DetailFetcher, EndpointConfig, GraphQlIndexer, Indexers,
    PriceFetcher, StatsFetcher, SystemClock,
};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio::sync::{oneshot, watch, Mutex};

/// Refreshes the dashboard data and publishes it through a [`watch`] channel.
#[derive(Debug)]
pub struct DashboardOrchestrator {
    registry: Arc<RollupRegistry>,
    prices: PriceFetcher,
    stats: StatsFetcher,
    details: DetailFetcher,
    state: watch::Sender<DashboardState>,
    in_flight: Mutex<()>,
    metrics: OrchestratorMetrics,
}

impl DashboardOrchestrator {
    /// Returns a new [`DashboardOrchestrator`] in the [`Phase::Initializing`] phase.
    pub fn new(
        registry: Arc<RollupRegistry>,
        prices: PriceFetcher,
        stats: StatsFetcher,
        details: DetailFetcher,
    ) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            registry,
            prices,
            stats,
            details,
            state,
            in_flight: Mutex::new(()),
            metrics: OrchestratorMetrics::default(),
        }
    }

    /// Returns a new [`DashboardOrchestrator`] talking to the configured upstream endpoints.
    pub fn from_endpoints(
        registry: Arc<RollupRegistry>,
        endpoints: &EndpointConfig,
        config: &OrchestratorConfig,
    ) -> Result<Self, OrchestratorError> {
        let fetchers = config.fetchers;
        let client = http_client(fetchers.request_timeout)?;
        let clock = Arc::new(SystemClock);

        let indexers = Indexers::new(
            Arc::new(GraphQlIndexer::new(client.clone(), endpoints.mainnet_indexer.clone())),
            Arc::new(GraphQlIndexer::new(client.clone(), endpoints.testnet_indexer.clone())),
        );
        let prices = PriceFetcher::new(
            Arc::new(CoinGeckoClient::new(client, endpoints.price_api.clone())),
            endpoints.price_token_id.clone(),
            fetchers.price_ttl,
            clock.clone(),
        );
        let stats = StatsFetcher::new(indexers.clone(), fetchers.cache_ttl, clock);
        let details = DetailFetcher::new(indexers, fetchers.page_size);

        Ok(Self::new(registry, prices, stats, details))
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Runs a refresh cycle and publishes the resulting snapshot.
    ///
    /// Returns [`None`] without fetching anything if another cycle is in flight. Fetch failures
    /// degrade to defaults, so a started cycle always completes.
    pub async fn refresh(&self, kind: RefreshKind) -> Option<RefreshReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(target: "rollups::orchestrator", ?kind, "refresh already in flight, skipping");
            self.metrics.skipped_refreshes.increment(1);
            return None;
        };

        let start = Instant::now();
        let (price, mainnet, testnet) = tokio::join!(
            self.prices.price(),
            self.network_cache(Network::Mainnet),
            self.network_cache(Network::Testnet),
        );
        let degraded_fetches = mainnet.health.degraded_fetches +
            testnet.health.degraded_fetches +
            usize::from(price.is_fallback());

        let mut cycle = 0;
        self.state.send_modify(|state| {
            cycle = state.cycle + 1;
            *state = DashboardState {
                phase: Phase::Ready,
                avail_price: price.value.or(state.avail_price),
                mainnet: Arc::new(mainnet),
                testnet: Arc::new(testnet),
                is_background_update: kind.is_background(),
                cycle,
                last_refresh: Some(chrono::Utc::now()),
            };
        });

        let duration = start.elapsed();
        self.metrics.refresh_cycles.increment(1);
        self.metrics.degraded_fetches.increment(degraded_fetches as u64);
        self.metrics.refresh_duration.record(duration.as_secs_f64());
        tracing::info!(target: "rollups::orchestrator", cycle, ?kind, ?duration, degraded_fetches, "refresh cycle completed");

        Some(RefreshReport { cycle, kind, duration, price_origin: price.origin, degraded_fetches })
    }

    /// Fetches everything displayed for the network: the rollup list, the network-wide stats and
    /// the stats of every rollup.
    async fn network_cache(&self, network: Network) -> NetworkCache {
        let rollups = self.registry.rollups(network);
        let (summaries, global, per_rollup) = tokio::join!(
            self.stats.rollup_list(network, rollups),
            self.stats.aggregate_stats(network, None),
            join_all(rollups.iter().map(|rollup| {
                self.stats.aggregate_stats(network, Some(rollup.app_id.as_str()))
            })),
        );

        let degraded_fetches = summaries.iter().filter(|summary| summary.is_fallback()).count() +
            per_rollup.iter().filter(|stats| stats.is_fallback()).count() +
            usize::from(global.is_fallback());
        if degraded_fetches > 0 {
            tracing::warn!(target: "rollups::orchestrator", %network, degraded_fetches, "network data is degraded");
        }

        NetworkCache {
            rollups: summaries.into_iter().map(|summary| summary.into_value()).collect(),
            stats: rollups
                .iter()
                .zip(per_rollup)
                .map(|(rollup, stats)| (rollup.app_id.clone(), stats.into_value()))
                .collect::<HashMap<_, _>>(),
            health: NetworkHealth { degraded_fetches, global_fallback: global.is_fallback() },
            global_stats: global.into_value(),
        }
    }

    /// Returns the rollup with the application id, if it is registered.
    pub fn rollup(&self, network: Network, app_id: &str) -> Option<&RollupConfig> {
        self.registry.find(network, app_id)
    }

    /// Returns a page of the submissions of `address` under `app_id`, or [`None`] if the fetch
    /// failed.
    pub async fn rollup_details(
        &self,
        network: Network,
        app_id: &str,
        address: &str,
        page: u32,
    ) -> Option<DetailPage> {
        self.details
            .rollup_details(network, app_id, address, page)
            .await
            .inspect_err(|err| {
                tracing::warn!(target: "rollups::orchestrator", ?err, %network, app_id, page, "failed to fetch rollup details");
            })
            .ok()
    }

    /// Returns an empty [`DetailView`] of the registered rollup, or [`None`] if the application id
    /// is unknown.
    pub fn detail_view(&self, network: Network, app_id: &str) -> Option<DetailView> {
        let rollup = self.rollup(network, app_id)?;
        Some(DetailView::new(network, &rollup.app_id, &rollup.address, self.details.page_size()))
    }

    /// Loads the displayed page of the view and merges it according to `mode`. Returns true if the
    /// displayed rows changed; a failed fetch leaves the view untouched.
    pub async fn load_detail(&self, view: &mut DetailView, mode: LoadMode) -> bool {
        let page = view.page();
        match self.rollup_details(view.network, &view.app_id, &view.address, page).await {
            Some(result) => view.apply(page, result, mode),
            None => false,
        }
    }

    /// Spawns the refresh loop: an eager [`RefreshKind::Initial`] cycle, then a
    /// [`RefreshKind::Background`] cycle every `refresh_interval`, the first one firing a full
    /// period after the initial load completed.
    pub fn spawn(self: Arc<Self>, config: &OrchestratorConfig) -> OrchestratorHandle {
        tracing::trace!(target: "rollups::orchestrator", ?config, "spawning dashboard orchestrator");
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        // closed once the task exits, including by panic.
        let (alive_tx, alive_rx) = watch::channel(());
        let orchestrator = self.clone();
        let period = config.refresh_interval;
        let task = tokio::spawn(async move {
            let _alive = alive_tx;
            orchestrator.run(period, shutdown_rx).await;
        });
        OrchestratorHandle::new(self, shutdown_tx, alive_rx, task)
    }

    /// Main execution loop of the [`DashboardOrchestrator`].
    async fn run(
        self: Arc<Self>,
        period: std::time::Duration,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        tokio::select! {
            _ = &mut shutdown => return,
            _ = self.refresh(RefreshKind::Initial) => {}
        }

        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    self.refresh(RefreshKind::Background).await;
                }
            }
        }
        tracing::info!(target: "rollups::orchestrator", "dashboard orchestrator stopped");
    }
}
