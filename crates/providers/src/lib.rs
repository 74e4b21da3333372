//! The crate exposes the upstream clients of the rollups dashboard along with the cached,
//! fail-soft fetchers built on top of them.

pub use cache::{CacheEntry, Clock, SystemClock, TtlCache};
mod cache;

pub use config::{
    http_client, EndpointConfig, FetcherConfig, MAINNET_INDEXER_URL, PRICE_API_URL,
    PRICE_TOKEN_ID, TESTNET_INDEXER_URL,
};
mod config;

pub use details::{reconcile, DetailFetcher};
mod details;

pub use error::ProviderError;
mod error;

pub use indexer::{
    ExtrinsicNode, GraphQlIndexer, IndexerProvider, Indexers, SubmissionAggregate,
    SubmissionHistory, SubmissionNode,
};
mod indexer;

pub use price::{CoinGeckoClient, PriceFetcher, PriceProvider};
mod price;

pub use stats::StatsFetcher;
mod stats;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
