use crate::{format_bytes, parse_app_id};
use serde::{Deserialize, Serialize};

/// The static descriptor of a rollup posting data to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupConfig {
    /// The display name.
    pub name: String,
    /// The application id the rollup submits under, as configured.
    pub app_id: String,
    /// The signer address of the rollup's submissions.
    pub address: String,
    /// The logo location.
    #[serde(default)]
    pub logo: Option<String>,
    /// The project website.
    #[serde(default)]
    pub website: Option<String>,
    /// The source repository.
    #[serde(default)]
    pub github: Option<String>,
    /// The block explorer.
    #[serde(default)]
    pub explorer: Option<String>,
}

impl RollupConfig {
    /// Returns a new [`RollupConfig`] without links.
    pub fn new(
        name: impl Into<String>,
        app_id: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            app_id: app_id.into(),
            address: address.into(),
            logo: None,
            website: None,
            github: None,
            explorer: None,
        }
    }

    /// Returns the application id as an integer.
    pub fn numeric_app_id(&self) -> Option<u32> {
        parse_app_id(&self.app_id)
    }
}

/// A [`RollupConfig`] enriched with the size of the blobs its signer submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupSummary {
    /// The static descriptor.
    pub config: RollupConfig,
    /// The submitted blob size, human readable.
    pub blobs_submitted: String,
    /// The submitted blob size in bytes.
    pub blob_bytes: u128,
}

impl RollupSummary {
    /// Returns a new summary for the config and byte count.
    pub fn new(config: RollupConfig, blob_bytes: u128) -> Self {
        Self { config, blobs_submitted: format_bytes(blob_bytes), blob_bytes }
    }
}
