use crate::adapters::SourceAdapter;
use crate::error::{AppError, AppResult};
use crate::models::{DashboardResult, DashboardState, ProfileSnapshot, SourceTag, WindowPolicy};
use crate::pipeline;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Runs the adapters, reconciles their histories and publishes the result
pub struct Orchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    policy: WindowPolicy,
    adapter_timeout: Duration,
    clock: Clock,
    run_lock: Mutex<()>,
    state_tx: watch::Sender<DashboardState>,
}

/// Restores the pre-run state if a run is dropped before it finishes
struct LoadingGuard<'a> {
    state_tx: &'a watch::Sender<DashboardState>,
    previous: Option<DashboardState>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(state_tx: &'a watch::Sender<DashboardState>) -> Self {
        let previous = state_tx.send_replace(DashboardState::Loading);
        Self {
            state_tx,
            previous: Some(previous),
        }
    }

    fn finish(mut self, state: DashboardState) {
        self.previous = None;
        self.state_tx.send_replace(state);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            warn!("Dashboard refresh abandoned, discarding in-flight result");
            self.state_tx.send_replace(previous);
        }
    }
}

impl Orchestrator {
    /// Create an orchestrator over a set of adapters
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, policy: WindowPolicy) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::Idle);

        Self {
            adapters,
            policy,
            adapter_timeout: Duration::from_secs(15), // Default: 15 seconds
            clock: Arc::new(|| Utc::now().date_naive()),
            run_lock: Mutex::new(()),
            state_tx,
        }
    }

    /// Set the per-adapter deadline
    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    /// Override how "today" is determined for window clipping
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Run one refresh for `identity`.
    ///
    /// Returns [`AppError::RunInProgress`] without doing anything if another
    /// run holds the lock. Adapter failures never fail the run; only a
    /// pipeline fault does, and that moves the state to `Failed`.
    pub async fn run(&self, identity: &str) -> AppResult<Arc<DashboardResult>> {
        let _lock = self.run_lock.try_lock().map_err(|_| {
            info!("Dashboard refresh already in progress, ignoring request");
            AppError::RunInProgress
        })?;

        let guard = LoadingGuard::enter(&self.state_tx);
        let run_id = Uuid::new_v4();
        info!(%run_id, "Dashboard refresh started for {}", identity);

        let snapshots = self.fetch_all(identity).await;
        let today = (self.clock)();

        match pipeline::reconcile(&snapshots, &self.policy, today) {
            Ok(unified_history) => {
                let result = Arc::new(DashboardResult {
                    run_id,
                    identity: identity.to_string(),
                    snapshots,
                    unified_history,
                    fetched_at: Utc::now(),
                });

                info!(
                    %run_id,
                    records = result.unified_history.len(),
                    degraded = ?result.degraded_sources(),
                    "Dashboard refresh completed"
                );

                guard.finish(DashboardState::Ready(result.clone()));
                Ok(result)
            }
            Err(e) => {
                error!(%run_id, "Dashboard pipeline failed: {}", e);
                guard.finish(DashboardState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Fetch every source concurrently; each call is bounded by the adapter timeout
    async fn fetch_all(&self, identity: &str) -> BTreeMap<SourceTag, ProfileSnapshot> {
        let timeout = self.adapter_timeout;
        let fetches = self.adapters.iter().map(|adapter| async move {
            match tokio::time::timeout(timeout, adapter.fetch(identity)).await {
                Ok(snapshot) => snapshot,
                Err(_) => {
                    warn!(
                        "{} fetch exceeded {:?}, using degraded snapshot",
                        adapter.source().display_name(),
                        timeout
                    );
                    adapter.degraded_snapshot().into_degraded()
                }
            }
        });

        let mut snapshots = BTreeMap::new();
        for snapshot in join_all(fetches).await {
            if let Some(replaced) = snapshots.insert(snapshot.source, snapshot) {
                warn!("More than one adapter registered for {}, keeping the last", replaced.source);
            }
        }
        snapshots
    }
}
