//! Rollups dashboard binary

use clap::Parser;
use eyre::OptionExt;
use rollups_dashboard::{dashboard_summary, detail_summary, DashboardArgs};
use rollups_orchestrator::{DashboardOrchestrator, DashboardState, OrchestratorHandle};
use rollups_primitives::{LoadMode, Network};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing_subscriber();

    let args = DashboardArgs::parse();
    let registry = Arc::new(args.registry()?);
    let config = args.orchestrator_config();
    info!(target: "rollups::dashboard", ?config, "launching dashboard");

    let orchestrator =
        Arc::new(DashboardOrchestrator::from_endpoints(registry, &args.endpoints(), &config)?);
    let handle = orchestrator.spawn(&config);

    let state = handle.wait_until_ready().await?;
    println!("{}", dashboard_summary(&state));

    if let Some(app_id) = &args.details {
        print_details(&handle, args.network, app_id, args.page).await?;
    }

    if !args.once {
        watch_updates(&handle).await;
    }

    handle.shutdown().await?;
    Ok(())
}

/// Prints the requested page of the rollup's submission history.
async fn print_details(
    handle: &OrchestratorHandle,
    network: Network,
    app_id: &str,
    page: u32,
) -> eyre::Result<()> {
    let mut view = handle
        .detail_view(network, app_id)
        .ok_or_eyre(format!("no rollup with app id {app_id} on {network}"))?;

    // the total page count is only known after the first load.
    handle.load_detail(&mut view, LoadMode::Foreground).await;
    if view.go_to(page) {
        handle.load_detail(&mut view, LoadMode::Foreground).await;
    }
    println!("{}", detail_summary(&view, chrono::Utc::now()));
    Ok(())
}

/// Logs every published snapshot until interrupted.
async fn watch_updates(handle: &OrchestratorHandle) {
    let mut updates = handle.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(target: "rollups::dashboard", "received interrupt, shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                log_state(&state);
            }
        }
    }
}

fn log_state(state: &DashboardState) {
    for network in Network::ALL {
        let cache = state.network(network);
        let totals = cache.network_totals();
        info!(
            target: "rollups::dashboard",
            %network,
            cycle = state.cycle,
            background = state.is_background_update,
            submissions = totals.total_submissions,
            size = %totals.total_size,
            cost = %totals.total_cost,
            degraded = cache.health.degraded_fetches,
            "network totals"
        );
    }
}

/// Initializes the tracing subscriber, filtered by `RUST_LOG` and defaulting to `info`.
fn init_tracing_subscriber() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true).with_ansi(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
