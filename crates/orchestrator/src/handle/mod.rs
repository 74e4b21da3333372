//! Handle to interact with a spawned [`DashboardOrchestrator`].

use crate::{
    DashboardOrchestrator, DashboardState, OrchestratorError, Phase, RefreshKind, RefreshReport,
};
use rollups_primitives::{DetailPage, DetailView, LoadMode, Network};
use std::sync::Arc;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
};

/// A handle to a spawned [`DashboardOrchestrator`].
///
/// Dropping the handle stops the refresh loop.
#[derive(Debug)]
pub struct OrchestratorHandle {
    orchestrator: Arc<DashboardOrchestrator>,
    state: watch::Receiver<DashboardState>,
    shutdown_tx: oneshot::Sender<()>,
    alive: watch::Receiver<()>,
    task: JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Creates a new [`OrchestratorHandle`].
    pub(crate) fn new(
        orchestrator: Arc<DashboardOrchestrator>,
        shutdown_tx: oneshot::Sender<()>,
        alive: watch::Receiver<()>,
        task: JoinHandle<()>,
    ) -> Self {
        let state = orchestrator.subscribe();
        Self { orchestrator, state, shutdown_tx, alive, task }
    }

    /// Returns the orchestrator.
    pub fn orchestrator(&self) -> &DashboardOrchestrator {
        &self.orchestrator
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Waits for the initial load to complete and returns the first ready snapshot.
    ///
    /// Returns [`OrchestratorError::Stopped`] if the refresh task exits before publishing it.
    pub async fn wait_until_ready(&self) -> Result<DashboardState, OrchestratorError> {
        let mut state = self.state.clone();
        let mut alive = self.alive.clone();
        tokio::select! {
            biased;
            ready = state.wait_for(|state| state.phase == Phase::Ready) => {
                Ok(ready.map_err(|_| OrchestratorError::Stopped)?.clone())
            }
            // nothing is ever sent, so this only resolves once the task is gone.
            _ = alive.changed() => {
                let current = self.state.borrow();
                if current.phase == Phase::Ready {
                    Ok(current.clone())
                } else {
                    Err(OrchestratorError::Stopped)
                }
            }
        }
    }

    /// Runs a refresh cycle now. Returns [`None`] if a cycle is already in flight.
    pub async fn refresh_now(&self) -> Option<RefreshReport> {
        self.orchestrator.refresh(RefreshKind::Manual).await
    }

    /// Returns a page of the submissions of `address` under `app_id`, or [`None`] if the fetch
    /// failed.
    pub async fn rollup_details(
        &self,
        network: Network,
        app_id: &str,
        address: &str,
        page: u32,
    ) -> Option<DetailPage> {
        self.orchestrator.rollup_details(network, app_id, address, page).await
    }

    /// Returns an empty view of the registered rollup, or [`None`] if the application id is
    /// unknown.
    pub fn detail_view(&self, network: Network, app_id: &str) -> Option<DetailView> {
        self.orchestrator.detail_view(network, app_id)
    }

    /// Loads the displayed page of the view, merging it according to `mode`.
    pub async fn load_detail(&self, view: &mut DetailView, mode: LoadMode) -> bool {
        self.orchestrator.load_detail(view, mode).await
    }

    /// Stops the refresh loop and waits for it to exit.
    pub async fn shutdown(self) -> Result<(), OrchestratorError> {
        // the loop may already be gone.
        let _ = self.shutdown_tx.send(());
        self.task.await?;
        Ok(())
    }
}
