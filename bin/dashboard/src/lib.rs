//! Command line front end of the rollups dashboard.

mod args;
pub use args::DashboardArgs;

mod summary;
pub use summary::{dashboard_summary, detail_summary, network_summary};
