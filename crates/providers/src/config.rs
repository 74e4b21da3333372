use crate::ProviderError;
use reqwest::{Client, Url};
use rollups_primitives::{Network, DEFAULT_PAGE_SIZE};
use std::time::Duration;

/// The default mainnet indexer endpoint.
pub const MAINNET_INDEXER_URL: &str = "https://indexer.avail.so/";

/// The default testnet indexer endpoint.
pub const TESTNET_INDEXER_URL: &str = "https://turing-indexer.avail.so/";

/// The default price API base.
pub const PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// The default price API token identifier.
pub const PRICE_TOKEN_ID: &str = "avail";

/// The upstream endpoints.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// The mainnet GraphQL indexer.
    pub mainnet_indexer: Url,
    /// The testnet GraphQL indexer.
    pub testnet_indexer: Url,
    /// The price API base.
    pub price_api: Url,
    /// The token identifier at the price API.
    pub price_token_id: String,
}

impl EndpointConfig {
    /// Returns the indexer endpoint of the network.
    pub const fn indexer(&self, network: Network) -> &Url {
        match network {
            Network::Mainnet => &self.mainnet_indexer,
            Network::Testnet => &self.testnet_indexer,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            mainnet_indexer: Url::parse(MAINNET_INDEXER_URL).expect("valid mainnet indexer url"),
            testnet_indexer: Url::parse(TESTNET_INDEXER_URL).expect("valid testnet indexer url"),
            price_api: Url::parse(PRICE_API_URL).expect("valid price api url"),
            price_token_id: PRICE_TOKEN_ID.to_string(),
        }
    }
}

/// Configuration of the fetchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    /// The time-to-live of aggregate stats and rollup sizes.
    pub cache_ttl: Duration,
    /// The time-to-live of the token price.
    pub price_ttl: Duration,
    /// The number of submissions per detail page.
    pub page_size: u32,
    /// The timeout of a single upstream request.
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            price_ttl: Duration::from_secs(5 * 60),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Returns the HTTP client shared by all upstream clients.
pub fn http_client(request_timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(request_timeout).build()?)
}
