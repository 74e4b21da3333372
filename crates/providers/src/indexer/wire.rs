//! GraphQL request and response shapes of the indexer.

use super::{ExtrinsicNode, SubmissionAggregate, SubmissionHistory, SubmissionNode};
use crate::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GraphQL query.
#[derive(Debug, Serialize)]
pub(super) struct Query<'a> {
    pub(super) query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) variables: Option<Map<String, Value>>,
}

/// A GraphQL response, converted into a [`Result`] by [`QueryResponse::into_result`].
#[derive(Debug, Deserialize)]
pub(super) struct QueryResponse<T> {
    #[serde(default = "empty_data")]
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<QueryError>>,
}

impl<T> QueryResponse<T> {
    pub(super) fn into_result(self) -> Result<T, ProviderError> {
        match self {
            Self { errors: Some(errors), .. } if !errors.is_empty() => {
                for error in &errors[1..] {
                    tracing::warn!(target: "rollups::providers", message = %error.message, "additional graphql error");
                }
                Err(ProviderError::GraphQl(errors[0].message.clone()))
            }
            Self { data: Some(data), .. } => Ok(data),
            _ => Err(ProviderError::InvalidResponse("graphql response without data")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryError {
    message: String,
}

const fn empty_data<T>() -> Option<T> {
    None
}

/// A number the indexer may encode as a JSON integer, float or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(super) enum LenientNumber {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Integer(n) => *n as f64,
            Self::Float(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn as_u128(&self) -> Option<u128> {
        match self {
            Self::Integer(n) => Some(*n as u128),
            Self::Text(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| float_to_u128(s.parse().ok()?))
            }
            Self::Float(n) => float_to_u128(*n),
        }
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_u128().and_then(|n| u64::try_from(n).ok())
    }
}

fn float_to_u128(value: f64) -> Option<u128> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u128)
}

fn lenient_u64(value: Option<&LenientNumber>) -> u64 {
    value.and_then(LenientNumber::as_u64).unwrap_or_default()
}

fn lenient_u128(value: Option<&LenientNumber>) -> u128 {
    value.and_then(LenientNumber::as_u128).unwrap_or_default()
}

fn lenient_f64(value: Option<&LenientNumber>) -> f64 {
    value.and_then(LenientNumber::as_f64).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AggregateData {
    data_submissions: AggregateConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateConnection {
    #[serde(default)]
    total_count: Option<LenientNumber>,
    #[serde(default)]
    aggregates: Option<Aggregates>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Aggregates {
    #[serde(default)]
    distinct_count: Option<DistinctCount>,
    #[serde(default)]
    sum: Option<Sums>,
}

#[derive(Debug, Deserialize)]
struct DistinctCount {
    #[serde(default)]
    id: Option<LenientNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sums {
    #[serde(default)]
    byte_size: Option<LenientNumber>,
    #[serde(default)]
    fees: Option<LenientNumber>,
}

impl From<AggregateData> for SubmissionAggregate {
    fn from(data: AggregateData) -> Self {
        let connection = data.data_submissions;
        let aggregates = connection.aggregates.unwrap_or_default();
        let sum = aggregates.sum.as_ref();
        Self {
            total_count: lenient_u64(connection.total_count.as_ref()),
            distinct_submissions: lenient_u64(
                aggregates.distinct_count.as_ref().and_then(|count| count.id.as_ref()),
            ),
            byte_size: lenient_u128(sum.and_then(|sum| sum.byte_size.as_ref())),
            fees: lenient_f64(sum.and_then(|sum| sum.fees.as_ref())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HistoryData {
    data_submissions: Connection<SubmissionWire>,
    extrinsics: Connection<ExtrinsicWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
    #[serde(default)]
    total_count: Option<LenientNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionWire {
    extrinsic_id: String,
    #[serde(default)]
    byte_size: Option<LenientNumber>,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtrinsicWire {
    tx_hash: String,
    timestamp: String,
    #[serde(default)]
    block: Option<BlockRef>,
}

#[derive(Debug, Deserialize)]
struct BlockRef {
    number: LenientNumber,
}

impl From<HistoryData> for SubmissionHistory {
    fn from(data: HistoryData) -> Self {
        let submissions = data
            .data_submissions
            .nodes
            .into_iter()
            .map(|node| SubmissionNode {
                extrinsic_id: node.extrinsic_id,
                byte_size: lenient_u64(node.byte_size.as_ref()),
                timestamp: node.timestamp,
            })
            .collect();
        let extrinsics = data
            .extrinsics
            .nodes
            .into_iter()
            .map(|node| ExtrinsicNode {
                tx_hash: node.tx_hash,
                timestamp: node.timestamp,
                block_number: node.block.and_then(|block| block.number.as_u64()),
            })
            .collect();
        Self {
            submissions,
            submissions_total: lenient_u64(data.data_submissions.total_count.as_ref()),
            extrinsics,
            extrinsics_total: lenient_u64(data.extrinsics.total_count.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde_json::json;

    fn response_from_json<T: DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
        serde_json::from_value::<QueryResponse<T>>(value).unwrap().into_result()
    }

    #[test]
    fn test_serialize_query() {
        let mut variables = Map::new();
        variables.insert("appId".to_string(), json!(17));
        let query = Query { query: "{ foo }", variables: Some(variables) };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "query": "{ foo }", "variables": { "appId": 17 } })
        );

        let query = Query { query: "{ foo }", variables: None };
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({ "query": "{ foo }" }));
    }

    #[test]
    fn test_error_response_reports_first_error() {
        let err = response_from_json::<bool>(json!({
            "data": true,
            "errors": [{ "message": "foo" }, { "message": "bar" }],
        }))
        .unwrap_err();
        assert!(matches!(err, ProviderError::GraphQl(message) if message == "foo"));
    }

    #[test]
    fn test_missing_data_is_invalid() {
        let err = response_from_json::<bool>(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
        assert!(response_from_json::<bool>(json!({ "data": true, "errors": [] })).unwrap());
    }

    #[test]
    fn test_aggregate_accepts_strings_and_numbers() {
        let data: AggregateData = response_from_json(json!({
            "data": { "dataSubmissions": {
                "totalCount": 42,
                "aggregates": {
                    "distinctCount": { "id": "40" },
                    "sum": { "byteSize": "123456789012", "fees": 12.5 }
                }
            }}
        }))
        .unwrap();
        assert_eq!(
            SubmissionAggregate::from(data),
            SubmissionAggregate {
                total_count: 42,
                distinct_submissions: 40,
                byte_size: 123_456_789_012,
                fees: 12.5,
            }
        );
    }

    #[test]
    fn test_aggregate_absent_sums_are_zero() {
        let data: AggregateData = response_from_json(json!({
            "data": { "dataSubmissions": {
                "totalCount": 0,
                "aggregates": {
                    "distinctCount": { "id": 0 },
                    "sum": { "byteSize": null, "fees": null }
                }
            }}
        }))
        .unwrap();
        assert_eq!(SubmissionAggregate::from(data), SubmissionAggregate::default());
    }

    #[test]
    fn test_history_parsing() {
        let data: HistoryData = response_from_json(json!({
            "data": {
                "dataSubmissions": {
                    "nodes": [
                        { "extrinsicId": "100-1", "byteSize": "2048", "timestamp": "2024-01-01T00:00:00" }
                    ],
                    "totalCount": "25"
                },
                "extrinsics": {
                    "nodes": [
                        { "txHash": "0xaa", "timestamp": "2024-01-01T00:00:00", "block": { "number": 100 } },
                        { "txHash": "0xbb", "timestamp": "2024-01-01T00:00:10", "block": null }
                    ],
                    "totalCount": 30
                }
            }
        }))
        .unwrap();
        let history = SubmissionHistory::from(data);
        assert_eq!(history.submissions_total, 25);
        assert_eq!(history.extrinsics_total, 30);
        assert_eq!(history.submissions[0].byte_size, 2048);
        assert_eq!(history.extrinsics[0].block_number, Some(100));
        assert_eq!(history.extrinsics[1].block_number, None);
    }

    #[test]
    fn test_lenient_number_rejects_garbage() {
        assert_eq!(LenientNumber::Text("abc".to_string()).as_u128(), None);
        assert_eq!(LenientNumber::Float(-1.0).as_u128(), None);
        assert_eq!(LenientNumber::Text("1.5".to_string()).as_f64(), Some(1.5));
        assert_eq!(LenientNumber::Text("7.9".to_string()).as_u64(), Some(7));
    }
}
