#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use cp_dashboard::adapters::{FetchOutcome, SourceAdapter};
use cp_dashboard::error::SourceError;
use cp_dashboard::models::{DashboardState, HistoryPoint, Metric, ProfileSnapshot, SourceTag};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Live snapshot with the given dated ratings as history
pub fn snapshot_with_history(source: SourceTag, points: &[(NaiveDate, f64)]) -> ProfileSnapshot {
    let current = points.last().map(|(_, r)| *r);
    let mut snapshot = ProfileSnapshot::new(source, Metric::from_option(current), Metric::from_option(current));
    snapshot.history = points
        .iter()
        .map(|(d, r)| HistoryPoint::new(*d, *r, source))
        .collect();
    snapshot
}

/// Adapter that returns a fixed snapshot, optionally after a delay
pub struct StubAdapter {
    snapshot: ProfileSnapshot,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubAdapter {
    pub fn new(snapshot: ProfileSnapshot) -> Self {
        Self {
            snapshot,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches that ran to completion
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for StubAdapter {
    fn source(&self) -> SourceTag {
        self.snapshot.source
    }

    async fn fetch(&self, _identity: &str) -> ProfileSnapshot {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone()
    }
}

/// Adapter whose live path always fails
pub struct FailingAdapter {
    source: SourceTag,
}

impl FailingAdapter {
    pub fn new(source: SourceTag) -> Self {
        Self { source }
    }
}

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn source(&self) -> SourceTag {
        self.source
    }

    async fn fetch(&self, _identity: &str) -> ProfileSnapshot {
        let attempt = Err(SourceError::Unavailable("connection refused".to_string()));
        FetchOutcome::from_attempt(attempt, || self.degraded_snapshot()).into_snapshot()
    }
}

pub fn shared<A: SourceAdapter + 'static>(adapter: A) -> Arc<dyn SourceAdapter> {
    Arc::new(adapter)
}

/// Wait for the next `Ready` state whose run differs from `after`
pub async fn next_ready(
    states: &mut watch::Receiver<DashboardState>,
    after: Option<uuid::Uuid>,
) -> Arc<cp_dashboard::models::DashboardResult> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let DashboardState::Ready(result) = &*states.borrow_and_update() {
                if Some(result.run_id) != after {
                    return result.clone();
                }
            }
            states.changed().await.expect("state channel closed");
        }
    })
    .await
    .expect("timed out waiting for Ready")
}

/// Fixture upstream answering canned JSON per request path
pub struct FixtureServer {
    pub base_url: String,
}

impl FixtureServer {
    /// Serve `routes` (path without query, status, body); other paths get 404
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let mut router = Router::new();
        for (path, status, body) in routes {
            let status = StatusCode::from_u16(status).expect("valid fixture status");
            let body = body.to_string();
            router = router.route(
                path,
                get(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
            );
        }
        let router = router.fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"not found"}"#,
            )
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture server address");

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
        }
    }
}

/// Base URL with nothing listening behind it
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind free port");
    let addr = listener.local_addr().expect("free port address");
    drop(listener);
    format!("http://{}", addr)
}
