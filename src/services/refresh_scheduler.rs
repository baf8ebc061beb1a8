use crate::models::DashboardState;
use crate::services::Orchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info};

/// Background task that refreshes the dashboard on an interval or on demand
pub struct RefreshScheduler {
    orchestrator: Arc<Orchestrator>,
    identity: String,
    interval: Duration,
}

/// Owner's side of a running scheduler.
///
/// Dropping the handle cancels the task.
pub struct RefreshHandle {
    trigger_tx: mpsc::Sender<()>,
    cancel_tx: Option<oneshot::Sender<()>>,
    states: watch::Receiver<DashboardState>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Create a new scheduler for one identity
    pub fn new(orchestrator: Arc<Orchestrator>, identity: impl Into<String>) -> Self {
        Self {
            orchestrator,
            identity: identity.into(),
            interval: Duration::from_secs(24 * 60 * 60), // Default: daily
        }
    }

    /// Set refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the refresh loop. The first refresh runs immediately.
    pub fn start(self) -> RefreshHandle {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let states = self.orchestrator.subscribe();

        let task = tokio::spawn(self.run_loop(trigger_rx, cancel_rx));

        RefreshHandle {
            trigger_tx,
            cancel_tx: Some(cancel_tx),
            states,
            task,
        }
    }

    async fn run_loop(self, mut triggers: mpsc::Receiver<()>, mut cancel: oneshot::Receiver<()>) {
        let mut interval = time::interval(self.interval);
        info!("Refresh scheduler started, refreshing every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = &mut cancel => break,
                _ = interval.tick() => debug!("Scheduled dashboard refresh"),
                trigger = triggers.recv() => match trigger {
                    Some(()) => info!("Manual dashboard refresh requested"),
                    None => break,
                },
            }

            // Cancellation wins over an in-flight run; its result is dropped unseen
            tokio::select! {
                _ = &mut cancel => break,
                result = self.orchestrator.run(&self.identity) => match result {
                    Ok(_) => {}
                    Err(e) if e.is_run_in_progress() => debug!("Skipped refresh: {}", e),
                    Err(e) => error!("Dashboard refresh failed: {}", e),
                },
            }
        }

        info!("Refresh scheduler stopped");
    }
}

impl RefreshHandle {
    /// Request an immediate refresh. Returns false if one is already queued.
    pub fn trigger(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }

    /// Receive dashboard state transitions
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.states.clone()
    }

    /// Stop the loop, abandoning any refresh in progress
    pub fn cancel(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Err(e) = (&mut self.task).await {
            error!("Refresh scheduler task panicked: {}", e);
        }
    }
}
