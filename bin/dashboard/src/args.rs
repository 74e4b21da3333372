use eyre::WrapErr;
use reqwest::Url;
use rollups_orchestrator::OrchestratorConfig;
use rollups_primitives::{Network, RollupRegistry, DEFAULT_PAGE_SIZE};
use rollups_providers::{
    EndpointConfig, FetcherConfig, MAINNET_INDEXER_URL, PRICE_API_URL, PRICE_TOKEN_ID,
    TESTNET_INDEXER_URL,
};
use std::{path::PathBuf, time::Duration};

/// Command line arguments of the dashboard.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "rollups-dashboard", about = "Tracks rollups submitting data to Avail")]
pub struct DashboardArgs {
    /// The GraphQL indexer of the mainnet.
    #[arg(long, env = "MAINNET_INDEXER_URL", default_value = MAINNET_INDEXER_URL)]
    pub mainnet_indexer_url: Url,
    /// The GraphQL indexer of the testnet.
    #[arg(long, env = "TESTNET_INDEXER_URL", default_value = TESTNET_INDEXER_URL)]
    pub testnet_indexer_url: Url,
    /// The base of the price API.
    #[arg(long, env = "PRICE_API_URL", default_value = PRICE_API_URL)]
    pub price_api_url: Url,
    /// The token identifier at the price API.
    #[arg(long, env = "PRICE_TOKEN_ID", default_value = PRICE_TOKEN_ID)]
    pub price_token_id: String,
    /// Seconds between two background refreshes.
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value_t = 60)]
    pub refresh_interval_secs: u64,
    /// Seconds aggregate stats and rollup sizes stay cached.
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,
    /// Seconds the token price stays cached.
    #[arg(long, env = "PRICE_TTL_SECS", default_value_t = 300)]
    pub price_ttl_secs: u64,
    /// Timeout of a single upstream request, in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    pub request_timeout_secs: u64,
    /// Number of submissions per detail page.
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
    /// A JSON file replacing the built-in rollup registry.
    #[arg(long, env = "ROLLUPS_FILE", value_name = "PATH")]
    pub rollups_file: Option<PathBuf>,
    /// Run the initial load, print the dashboard and exit.
    #[arg(long)]
    pub once: bool,
    /// Print a page of the submission history of the rollup with this application id.
    #[arg(long, value_name = "APP_ID")]
    pub details: Option<String>,
    /// The network of the rollup passed to `--details`.
    #[arg(long, default_value_t = Network::Mainnet)]
    pub network: Network,
    /// The page printed by `--details`, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl DashboardArgs {
    /// Returns the upstream endpoints.
    pub fn endpoints(&self) -> EndpointConfig {
        EndpointConfig {
            mainnet_indexer: self.mainnet_indexer_url.clone(),
            testnet_indexer: self.testnet_indexer_url.clone(),
            price_api: self.price_api_url.clone(),
            price_token_id: self.price_token_id.clone(),
        }
    }

    /// Returns the orchestrator configuration.
    pub const fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            fetchers: FetcherConfig {
                cache_ttl: Duration::from_secs(self.cache_ttl_secs),
                price_ttl: Duration::from_secs(self.price_ttl_secs),
                page_size: self.page_size,
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
        }
    }

    /// Returns the rollup registry, read from `--rollups-file` if set.
    pub fn registry(&self) -> eyre::Result<RollupRegistry> {
        let Some(path) = &self.rollups_file else {
            return Ok(RollupRegistry::builtin());
        };
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read rollups file {}", path.display()))?;
        RollupRegistry::from_json(&json)
            .wrap_err_with(|| format!("invalid rollups file {}", path.display()))
    }
}
