//! The static, hand-maintained table of known rollups per network.

use crate::{Network, RollupConfig};
use serde::Deserialize;
use std::collections::HashSet;

/// Parses a configured application id. Only positive integers are valid.
pub fn parse_app_id(app_id: &str) -> Option<u32> {
    app_id.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

/// An error building a [`RollupRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The application id is not a positive integer.
    #[error("invalid app id {app_id:?} for rollup {name} on {network}")]
    InvalidAppId {
        /// The network of the entry.
        network: Network,
        /// The rollup name.
        name: String,
        /// The offending app id.
        app_id: String,
    },
    /// Two entries of the same network share an application id.
    #[error("duplicate app id {app_id} on {network}")]
    DuplicateAppId {
        /// The network of the entries.
        network: Network,
        /// The duplicated app id.
        app_id: String,
    },
    /// The registry file could not be decoded.
    #[error("failed to decode rollup registry: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The known rollups of both networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupRegistry {
    mainnet: Vec<RollupConfig>,
    testnet: Vec<RollupConfig>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    mainnet: Vec<RollupConfig>,
    #[serde(default)]
    testnet: Vec<RollupConfig>,
}

impl RollupRegistry {
    /// Returns a validated registry from the provided entries. Application ids are rewritten to
    /// their canonical integer form.
    pub fn new(
        mut mainnet: Vec<RollupConfig>,
        mut testnet: Vec<RollupConfig>,
    ) -> Result<Self, RegistryError> {
        validate(Network::Mainnet, &mut mainnet)?;
        validate(Network::Testnet, &mut testnet)?;
        Ok(Self { mainnet, testnet })
    }

    /// Decodes and validates a registry from JSON shaped as `{ "mainnet": [..], "testnet": [..] }`.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::new(file.mainnet, file.testnet)
    }

    /// Returns the built-in registry.
    pub fn builtin() -> Self {
        Self {
            mainnet: vec![
                entry(
                    "Sophon",
                    "17",
                    "5FsjDzdeUbgYZPexD7gL1D35yX1CJQfsL98HCLkPHS9og4QF",
                    [
                        Some("/logos/rollups/sophon.jpg"),
                        Some("https://sophon.xyz"),
                        Some("https://github.com/sophon-org"),
                        Some("https://explorer.sophon.xyz/"),
                    ],
                ),
                entry(
                    "Rooch",
                    "20",
                    "5GWHjsx9URmAdW6PRdShMdq2PFPq4nJimk577KKyCpCa4K1o",
                    [
                        Some("/logos/rollups/rooch.jpg"),
                        Some("https://rooch.network"),
                        Some("https://github.com/rooch-network"),
                        Some("https://avail.subscan.io/account/5GWHjsx9URmAdW6PRdShMdq2PFPq4nJimk577KKyCpCa4K1o"),
                    ],
                ),
                entry(
                    "Skate",
                    "19",
                    "5DaNuvMWnbP3ywbtPDDe2kTSXvtE5npXDcmay6QUYZrGKQHJ",
                    [
                        Some("/logos/rollups/skate.jpeg"),
                        Some("https://www.skatechain.org/"),
                        Some("https://github.com/Skate-Org"),
                        Some("https://scan.skatechain.org/"),
                    ],
                ),
            ],
            testnet: vec![
                entry("Eternal", "18", "5CocSpj62xG11MAkQMzsd7h8wRoxx1E44f8tJUUrPaWQ4opj", [None; 4]),
                entry("Neova", "34", "5GEQ6S3vpSFjYCqsrndQhcPL3sh8uAYbpeCiZFhF4u9EjK6F", [None; 4]),
                entry(
                    "Op-Alt-DA",
                    "57",
                    "5FWWnzg9TpdUZx4D8TZxsgaGjDg1zvW17L6sqjKWtru13T4U",
                    [None; 4],
                ),
                entry("Pivotal", "75", "5D5HufUivu1S7snNh6DdyitVyUFjQZhhJaPbPUnJi3kCXg3J", [None; 4]),
                entry(
                    "Sophon",
                    "102",
                    "5HRQKm9h4oqbvvU4fyFYCcia95PrMNNDhTPgsUDs5KSK15zA",
                    [Some("/logos/rollups/sophon.jpg"), None, None, None],
                ),
                entry(
                    "Orbit Rollup",
                    "107",
                    "5CouPui3BUJu68bUCEMhyfgC5jMcLH8teJaiXXz3jwGxPwWQ",
                    [None; 4],
                ),
            ],
        }
    }

    /// Returns the rollups configured for the network, in configuration order.
    pub fn rollups(&self, network: Network) -> &[RollupConfig] {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }

    /// Returns the rollup with the provided application id, compared numerically.
    pub fn find(&self, network: Network, app_id: &str) -> Option<&RollupConfig> {
        let app_id = parse_app_id(app_id)?;
        self.rollups(network).iter().find(|rollup| rollup.numeric_app_id() == Some(app_id))
    }
}

/// Builds an entry; `links` holds logo, website, github and explorer in that order.
fn entry(name: &str, app_id: &str, address: &str, links: [Option<&str>; 4]) -> RollupConfig {
    let [logo, website, github, explorer] = links.map(|link| link.map(str::to_string));
    RollupConfig { logo, website, github, explorer, ..RollupConfig::new(name, app_id, address) }
}

fn validate(network: Network, rollups: &mut [RollupConfig]) -> Result<(), RegistryError> {
    let mut seen = HashSet::with_capacity(rollups.len());
    for rollup in rollups {
        let id = parse_app_id(&rollup.app_id).ok_or_else(|| RegistryError::InvalidAppId {
            network,
            name: rollup.name.clone(),
            app_id: rollup.app_id.clone(),
        })?;
        if !seen.insert(id) {
            return Err(RegistryError::DuplicateAppId { network, app_id: rollup.app_id.clone() });
        }
        rollup.app_id = id.to_string();
    }
    Ok(())
}
