//! Source adapters: one per platform.
//!
//! Each adapter owns all knowledge of its platform's response schema and
//! turns whatever comes back (including failures) into a
//! [`ProfileSnapshot`]. Nothing an upstream does can make `fetch` fail.

pub mod codechef;
pub mod codeforces;
pub mod http;
pub mod leetcode;

pub use codechef::{CodeChefAdapter, CodeChefFallback};
pub use codeforces::CodeforcesAdapter;
pub use http::HttpClient;
pub use leetcode::LeetCodeAdapter;

use crate::config::AppConfig;
use crate::error::SourceError;
use crate::models::{ProfileSnapshot, SourceTag};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Contract every platform adapter fulfils
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which platform this adapter speaks to
    fn source(&self) -> SourceTag;

    /// Fetch a snapshot for `identity`. Never fails; failures come back degraded.
    async fn fetch(&self, identity: &str) -> ProfileSnapshot;

    /// Snapshot to use when the live path fails or is abandoned
    fn degraded_snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot::unavailable(self.source())
    }
}

/// Result of one live attempt, before it leaves the adapter
#[derive(Debug)]
pub enum FetchOutcome {
    Success(ProfileSnapshot),
    Degraded(ProfileSnapshot, SourceError),
}

impl FetchOutcome {
    /// Pair a live attempt with the adapter's degraded snapshot
    pub fn from_attempt(
        attempt: Result<ProfileSnapshot, SourceError>,
        degraded: impl FnOnce() -> ProfileSnapshot,
    ) -> Self {
        match attempt {
            Ok(snapshot) => FetchOutcome::Success(snapshot),
            Err(reason) => FetchOutcome::Degraded(degraded(), reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded(..))
    }

    /// Collapse to a snapshot, logging the reason for any degradation
    pub fn into_snapshot(self) -> ProfileSnapshot {
        match self {
            FetchOutcome::Success(snapshot) => snapshot,
            FetchOutcome::Degraded(snapshot, reason) => {
                warn!(
                    source = %snapshot.source,
                    unavailable = reason.is_unavailable(),
                    "{} fetch failed, using degraded snapshot: {}",
                    snapshot.source.display_name(),
                    reason
                );
                snapshot.into_degraded()
            }
        }
    }
}

/// The three live adapters, in display order
pub fn default_adapters(config: &AppConfig) -> Vec<Arc<dyn SourceAdapter>> {
    let http = HttpClient::new(config.refresh.adapter_timeout());

    let codechef = if config.codechef_fallback {
        CodeChefAdapter::new(http.clone())
    } else {
        CodeChefAdapter::new(http.clone()).without_fallback()
    };

    vec![
        Arc::new(CodeforcesAdapter::new(http.clone())),
        Arc::new(LeetCodeAdapter::new(http)),
        Arc::new(codechef),
    ]
}
