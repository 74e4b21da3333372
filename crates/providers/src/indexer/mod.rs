//! Exposes the [`IndexerProvider`] trait allowing to query the submission indexer of a network.

mod client;
pub use client::GraphQlIndexer;

mod wire;

use crate::ProviderError;
use rollups_primitives::Network;
use std::{fmt::Debug, sync::Arc};

/// Network-wide or per-rollup aggregate of data submissions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubmissionAggregate {
    /// The number of matching submissions.
    pub total_count: u64,
    /// The number of distinct submission ids.
    pub distinct_submissions: u64,
    /// The summed blob size in bytes.
    pub byte_size: u128,
    /// The summed fees in the native token.
    pub fees: f64,
}

/// A data submission as returned by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionNode {
    /// The id of the extrinsic carrying the submission.
    pub extrinsic_id: String,
    /// The blob size in bytes.
    pub byte_size: u64,
    /// The indexer timestamp.
    pub timestamp: String,
}

/// A `submitData` extrinsic as returned by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicNode {
    /// The extrinsic hash.
    pub tx_hash: String,
    /// The indexer timestamp.
    pub timestamp: String,
    /// The number of the including block, if the indexer linked it.
    pub block_number: Option<u64>,
}

/// One page of submissions and one page of extrinsics over the same rollup filter.
///
/// The two lists are paginated independently by the indexer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionHistory {
    /// The submissions, newest first.
    pub submissions: Vec<SubmissionNode>,
    /// The total number of submissions matching the filter.
    pub submissions_total: u64,
    /// The extrinsics, newest first.
    pub extrinsics: Vec<ExtrinsicNode>,
    /// The total number of extrinsics matching the filter.
    pub extrinsics_total: u64,
}

/// An implementation of the trait can answer the dashboard's queries for one network.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait IndexerProvider: Debug + Send + Sync {
    /// Returns the aggregate of all submissions, or of the application's submissions.
    async fn aggregate_stats(
        &self,
        app_id: Option<u32>,
    ) -> Result<SubmissionAggregate, ProviderError>;

    /// Returns the summed blob size submitted by `address` under the application id.
    async fn signer_byte_size(&self, app_id: u32, address: &str) -> Result<u128, ProviderError>;

    /// Returns a page of the submission history of `address` under the application id.
    async fn submission_history(
        &self,
        app_id: u32,
        address: &str,
        first: u32,
        offset: u64,
    ) -> Result<SubmissionHistory, ProviderError>;
}

/// The indexers of both networks.
#[derive(Debug, Clone)]
pub struct Indexers {
    mainnet: Arc<dyn IndexerProvider>,
    testnet: Arc<dyn IndexerProvider>,
}

impl Indexers {
    /// Returns a new [`Indexers`] from the per network providers.
    pub fn new(mainnet: Arc<dyn IndexerProvider>, testnet: Arc<dyn IndexerProvider>) -> Self {
        Self { mainnet, testnet }
    }

    /// Returns the indexer of the network.
    pub fn get(&self, network: Network) -> &dyn IndexerProvider {
        match network {
            Network::Mainnet => self.mainnet.as_ref(),
            Network::Testnet => self.testnet.as_ref(),
        }
    }
}
