use super::{
    wire::{AggregateData, HistoryData, Query, QueryResponse},
    IndexerProvider, SubmissionAggregate, SubmissionHistory,
};
use crate::ProviderError;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

const TOTAL_STATS_QUERY: &str = r#"query TotalStats {
  dataSubmissions {
    totalCount
    aggregates { distinctCount { id } sum { byteSize fees } }
  }
}"#;

const APP_STATS_QUERY: &str = r#"query AppStats($appId: Int!) {
  dataSubmissions(filter: { appId: { equalTo: $appId } }) {
    totalCount
    aggregates { distinctCount { id } sum { byteSize fees } }
  }
}"#;

const SIGNER_SIZE_QUERY: &str = r#"query SignerSize($appId: Int!, $address: String!) {
  dataSubmissions(filter: { appId: { equalTo: $appId }, signer: { equalTo: $address } }) {
    totalCount
    aggregates { sum { fees byteSize } }
  }
}"#;

const SUBMISSION_HISTORY_QUERY: &str = r#"query SubmissionHistory($appId: Int!, $address: String!, $first: Int!, $offset: Int!) {
  dataSubmissions(
    filter: { appId: { equalTo: $appId }, signer: { equalTo: $address } }
    orderBy: TIMESTAMP_DESC
    first: $first
    offset: $offset
  ) {
    nodes { extrinsicId byteSize timestamp }
    totalCount
  }
  extrinsics(
    filter: {
      module: { equalTo: "dataAvailability" }
      call: { equalTo: "submitData" }
      signer: { equalTo: $address }
    }
    orderBy: TIMESTAMP_DESC
    first: $first
    offset: $offset
  ) {
    nodes { txHash timestamp block { number } }
    totalCount
  }
}"#;

/// An [`IndexerProvider`] querying a GraphQL indexer over HTTP.
#[derive(Debug, Clone)]
pub struct GraphQlIndexer {
    client: Client,
    url: Url,
}

impl GraphQlIndexer {
    /// Returns a new [`GraphQlIndexer`] posting queries to `url`.
    pub const fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Performs the GraphQL query against the indexer.
    pub async fn query<T>(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(target: "rollups::providers", url = %self.url, "querying indexer");
        self.client
            .post(self.url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&Query { query, variables })
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse<T>>()
            .await?
            .into_result()
    }
}

fn variables(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Map<String, Value> {
    pairs.into_iter().map(|(key, value)| (key.to_string(), value)).collect()
}

#[async_trait::async_trait]
impl IndexerProvider for GraphQlIndexer {
    async fn aggregate_stats(
        &self,
        app_id: Option<u32>,
    ) -> Result<SubmissionAggregate, ProviderError> {
        let data: AggregateData = match app_id {
            Some(app_id) => {
                self.query(APP_STATS_QUERY, Some(variables([("appId", json!(app_id))]))).await?
            }
            None => self.query(TOTAL_STATS_QUERY, None).await?,
        };
        Ok(data.into())
    }

    async fn signer_byte_size(&self, app_id: u32, address: &str) -> Result<u128, ProviderError> {
        let data: AggregateData = self
            .query(
                SIGNER_SIZE_QUERY,
                Some(variables([("appId", json!(app_id)), ("address", json!(address))])),
            )
            .await?;
        Ok(SubmissionAggregate::from(data).byte_size)
    }

    async fn submission_history(
        &self,
        app_id: u32,
        address: &str,
        first: u32,
        offset: u64,
    ) -> Result<SubmissionHistory, ProviderError> {
        let data: HistoryData = self
            .query(
                SUBMISSION_HISTORY_QUERY,
                Some(variables([
                    ("appId", json!(app_id)),
                    ("address", json!(address)),
                    ("first", json!(first)),
                    ("offset", json!(offset)),
                ])),
            )
            .await?;
        Ok(data.into())
    }
}
