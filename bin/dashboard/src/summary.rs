//! Plain text rendering of the dashboard.

use chrono::{DateTime, Utc};
use rollups_orchestrator::DashboardState;
use rollups_primitives::{format_usd, relative_time, DetailView, Network, NetworkCache};

/// Renders the totals and the rollups of the network, largest first.
pub fn network_summary(network: Network, cache: &NetworkCache, price: Option<f64>) -> String {
    let totals = cache.network_totals();
    let usd = price.and_then(|price| totals.usd_cost(price)).map(format_usd);

    let mut lines = vec![format!(
        "{network}: {} submissions, {}, {}{}",
        totals.total_submissions,
        totals.total_size,
        totals.total_cost,
        usd.map(|usd| format!(" ({usd})")).unwrap_or_default(),
    )];
    if !cache.health.is_healthy() {
        lines.push(format!("  degraded: {} fetches fell back", cache.health.degraded_fetches));
    }
    for rollup in cache.filtered_rollups("") {
        lines.push(format!(
            "  {:<16} app {:>4}  {}",
            rollup.config.name, rollup.config.app_id, rollup.blobs_submitted
        ));
    }
    lines.join("\n")
}

/// Renders both networks.
pub fn dashboard_summary(state: &DashboardState) -> String {
    let price = match state.avail_price {
        Some(price) => format!("AVAIL {}", format_usd(price)),
        None => "AVAIL price unavailable".to_string(),
    };
    let mut sections = vec![price];
    sections.extend(
        Network::ALL
            .into_iter()
            .map(|network| network_summary(network, state.network(network), state.avail_price)),
    );
    sections.join("\n")
}

/// Renders the displayed page of a detail view.
pub fn detail_summary(view: &DetailView, now: DateTime<Utc>) -> String {
    let header =
        format!("{} app {} page {}/{}", view.network, view.app_id, view.page(), view.total_pages());
    let mut lines = vec![header];
    for row in view.rows() {
        lines.push(format!(
            "  {:>10}  {}  {:>10}  {}",
            row.block.map(|block| block.to_string()).unwrap_or_else(|| "-".to_string()),
            row.tx_hash.as_deref().unwrap_or("-"),
            row.blob_size_display(),
            relative_time(&row.timestamp, now),
        ));
    }
    lines.join("\n")
}
