use crate::format_bytes;
use serde::{Deserialize, Serialize};

/// One data submission of a rollup, joined with the extrinsic that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// The application id of the submission.
    pub app_id: String,
    /// The number of the block including the extrinsic, if it was matched.
    pub block: Option<u64>,
    /// The extrinsic hash, if it was matched.
    pub tx_hash: Option<String>,
    /// The blob size in bytes.
    pub blob_size: u64,
    /// The indexer timestamp of the submission.
    pub timestamp: String,
}

impl SubmissionRecord {
    /// Returns the blob size, human readable.
    pub fn blob_size_display(&self) -> String {
        format_bytes(u128::from(self.blob_size))
    }
}

/// One page of a rollup's submission history.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailPage {
    /// The records of the page, newest first.
    pub data: Vec<SubmissionRecord>,
    /// The total number of submissions across all pages.
    pub total_count: u64,
}

impl DetailPage {
    /// Returns the number of pages for the page size. There is always at least one page.
    pub fn total_pages(&self, page_size: u32) -> u32 {
        let page_size = u64::from(page_size.max(1));
        let pages = self.total_count.div_ceil(page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
