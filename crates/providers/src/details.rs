//! Paginated submission history of a single rollup.

use crate::{ExtrinsicNode, Indexers, ProviderError, SubmissionHistory};
use rollups_primitives::{parse_app_id, DetailPage, Network, SubmissionRecord};
use std::collections::{HashMap, VecDeque};

/// Fetches pages of a rollup's submission history. Results are never cached.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    indexers: Indexers,
    page_size: u32,
}

impl DetailFetcher {
    /// Returns a new [`DetailFetcher`] serving pages of `page_size` records.
    pub fn new(indexers: Indexers, page_size: u32) -> Self {
        Self { indexers, page_size: page_size.max(1) }
    }

    /// Returns the page size.
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the given 1-based page of the submissions of `address` under `app_id`.
    ///
    /// Errors are propagated to the caller.
    pub async fn rollup_details(
        &self,
        network: Network,
        app_id: &str,
        address: &str,
        page: u32,
    ) -> Result<DetailPage, ProviderError> {
        if page == 0 {
            return Err(ProviderError::InvalidPage(page));
        }
        let numeric_app_id =
            parse_app_id(app_id).ok_or_else(|| ProviderError::InvalidAppId(app_id.to_string()))?;
        let offset = u64::from(page - 1) * u64::from(self.page_size);

        tracing::debug!(target: "rollups::providers", %network, app_id, address, page, offset, "fetching rollup details");
        let history = self
            .indexers
            .get(network)
            .submission_history(numeric_app_id, address, self.page_size, offset)
            .await?;

        let total_count = history.submissions_total;
        Ok(DetailPage { data: reconcile(app_id, history), total_count })
    }
}

/// Joins every submission with the first not yet claimed extrinsic sharing its timestamp.
///
/// The submission order is preserved. Submissions without a matching extrinsic have neither block
/// nor hash.
pub fn reconcile(app_id: &str, history: SubmissionHistory) -> Vec<SubmissionRecord> {
    let mut by_timestamp: HashMap<String, VecDeque<ExtrinsicNode>> = HashMap::new();
    for extrinsic in history.extrinsics {
        by_timestamp.entry(extrinsic.timestamp.clone()).or_default().push_back(extrinsic);
    }

    history
        .submissions
        .into_iter()
        .map(|submission| {
            let extrinsic =
                by_timestamp.get_mut(&submission.timestamp).and_then(VecDeque::pop_front);
            SubmissionRecord {
                app_id: app_id.to_string(),
                block: extrinsic.as_ref().and_then(|extrinsic| extrinsic.block_number),
                tx_hash: extrinsic.map(|extrinsic| extrinsic.tx_hash),
                blob_size: submission.byte_size,
                timestamp: submission.timestamp,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::MockIndexer, SubmissionNode};
    use std::sync::Arc;

    fn submission(id: &str, size: u64, timestamp: &str) -> SubmissionNode {
        SubmissionNode {
            extrinsic_id: id.to_string(),
            byte_size: size,
            timestamp: timestamp.to_string(),
        }
    }

    fn extrinsic(hash: &str, timestamp: &str, block: u64) -> ExtrinsicNode {
        ExtrinsicNode {
            tx_hash: hash.to_string(),
            timestamp: timestamp.to_string(),
            block_number: Some(block),
        }
    }

    fn history(count: u64) -> SubmissionHistory {
        let timestamp = |i: u64| format!("2024-01-01T00:{:02}:00", 59 - i);
        let submissions = (0..count)
            .map(|i| submission(&format!("{i}-1"), 100 + i, &timestamp(i)))
            .collect::<Vec<_>>();
        let extrinsics = (0..count)
            .map(|i| extrinsic(&format!("0x{i:02x}"), &timestamp(i), 1000 - i))
            .collect::<Vec<_>>();
        SubmissionHistory {
            submissions,
            submissions_total: count,
            extrinsics,
            extrinsics_total: count,
        }
    }

    fn fetcher(indexer: &MockIndexer, page_size: u32) -> DetailFetcher {
        DetailFetcher::new(
            Indexers::new(Arc::new(MockIndexer::default()), Arc::new(indexer.clone())),
            page_size,
        )
    }

    #[test]
    fn test_reconcile_claims_each_extrinsic_once() {
        let history = SubmissionHistory {
            submissions: vec![
                submission("1-1", 10, "T1"),
                submission("1-2", 20, "T1"),
                submission("2-1", 30, "T2"),
            ],
            submissions_total: 3,
            extrinsics: vec![extrinsic("0xa", "T1", 1), extrinsic("0xb", "T1", 1)],
            extrinsics_total: 2,
        };

        let records = reconcile("17", history);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].tx_hash.as_deref(), Some("0xa"));
        assert_eq!(records[1].tx_hash.as_deref(), Some("0xb"));
        assert_eq!(records[2].tx_hash, None);
        assert_eq!(records[2].block, None);
        assert_eq!(records[2].blob_size, 30);
        assert!(records.iter().all(|record| record.app_id == "17"));
    }

    #[tokio::test]
    async fn test_pages_are_offset_by_page_size() -> eyre::Result<()> {
        let indexer = MockIndexer::default().with_history(102, "5Addr", history(25));
        let fetcher = fetcher(&indexer, 10);

        let first = fetcher.rollup_details(Network::Testnet, "102", "5Addr", 1).await?;
        assert_eq!(first.total_count, 25);
        assert_eq!(first.total_pages(fetcher.page_size()), 3);
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.data[0].tx_hash.as_deref(), Some("0x00"));
        assert_eq!(first.data[0].block, Some(1000));

        let last = fetcher.rollup_details(Network::Testnet, "102", "5Addr", 3).await?;
        assert_eq!(last.data.len(), 5);
        assert_eq!(last.data[0].tx_hash.as_deref(), Some("0x14"));
        assert_eq!(indexer.history_requests(), vec![(102, 10, 0), (102, 10, 20)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_history_has_one_page() -> eyre::Result<()> {
        let indexer = MockIndexer::default();
        let page = fetcher(&indexer, 10).rollup_details(Network::Testnet, "75", "5Addr", 1).await?;
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages(10), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected_without_request() -> eyre::Result<()> {
        let indexer = MockIndexer::default();
        let fetcher = fetcher(&indexer, 10);

        let err = fetcher.rollup_details(Network::Testnet, "102", "5Addr", 0).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPage(0)));
        let err = fetcher.rollup_details(Network::Testnet, "abc", "5Addr", 1).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidAppId(_)));
        assert!(indexer.history_requests().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_errors_are_propagated() -> eyre::Result<()> {
        let indexer = MockIndexer::default().with_history(102, "5Addr", history(3));
        indexer.set_failing(true);
        let fetcher = fetcher(&indexer, 10);
        assert!(fetcher.rollup_details(Network::Testnet, "102", "5Addr", 1).await.is_err());
        Ok(())
    }
}
