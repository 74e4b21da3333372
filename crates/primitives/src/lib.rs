//! Primitive types for the rollups dashboard.

pub use detail::{DetailView, LoadMode, DEFAULT_PAGE_SIZE};
mod detail;

pub use format::{format_avail, format_bytes, format_usd, relative_time, AVAIL_SYMBOL};
mod format;

pub use network::{Network, NetworkCache, NetworkHealth};
mod network;

pub use registry::{parse_app_id, RegistryError, RollupRegistry};
mod registry;

pub use rollup::{RollupConfig, RollupSummary};
mod rollup;

pub use sourced::{Origin, Sourced};
mod sourced;

pub use stats::AggregateStats;
mod stats;

pub use submission::{DetailPage, SubmissionRecord};
mod submission;
