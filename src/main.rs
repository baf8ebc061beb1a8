//! CP Dashboard Service
//!
//! Main entry point for the unified competitive programming dashboard.
//! This service:
//! - Fetches Codeforces, LeetCode and CodeChef profiles concurrently
//! - Reconciles their rating histories onto one date axis
//! - Refreshes on an interval and publishes each state change

use cp_dashboard::adapters::default_adapters;
use cp_dashboard::models::{DashboardState, Lookback};
use cp_dashboard::{AppConfig, AppError, AppResult, DashboardView, Orchestrator, RefreshScheduler};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cp_dashboard={},reqwest=warn", config.log_level).into()
    });

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           CP Dashboard Service Starting                  ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("Handle: {}", config.handle);
    match config.window.lookback {
        Lookback::Days(days) => info!("Lookback: {} days", days),
        Lookback::All => info!("Lookback: all time"),
    }
    info!("Window granularity: {}", config.window.granularity.as_str());

    // =========================================================================
    // SERVICES
    // =========================================================================
    let adapters = default_adapters(&config);
    info!("✓ {} source adapters initialized", adapters.len());
    if !config.codechef_fallback {
        warn!("CodeChef fallback data disabled, outages will show N/A");
    }

    let orchestrator = Arc::new(
        Orchestrator::new(adapters, config.window).with_adapter_timeout(config.refresh.adapter_timeout()),
    );
    info!(
        "✓ Orchestrator initialized ({}s per-source timeout)",
        config.refresh.adapter_timeout_secs
    );

    let handle = RefreshScheduler::new(orchestrator, config.handle.clone())
        .with_interval(config.refresh.interval())
        .start();
    info!(
        "✓ Refresh scheduler started ({}s interval)",
        config.refresh.interval_secs
    );

    let states = handle.subscribe();
    let reporter = tokio::spawn(report_states(states));

    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = reporter => {
            error!("State reporter exited unexpectedly");
        }
    }

    handle.shutdown().await;

    info!("CP dashboard service shutdown complete");
    Ok(())
}

/// Log every dashboard transition along with the rendered view
async fn report_states(mut states: watch::Receiver<DashboardState>) {
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        info!("Dashboard state: {}", state.as_str());

        if let DashboardState::Ready(result) = &state {
            for snapshot in result.snapshots.values() {
                if snapshot.dropped_history_entries > 0 {
                    warn!(
                        "{}: {} history entries dropped",
                        snapshot.source.display_name(),
                        snapshot.dropped_history_entries
                    );
                }
            }
        }

        if !state.is_loading() {
            match DashboardView::from_state(&state).to_json() {
                Ok(json) => info!("{}", json),
                Err(e) => error!("Failed to render dashboard view: {}", e),
            }
        }
    }
}
