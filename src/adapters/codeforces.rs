//! Codeforces adapter.
//!
//! Uses the public `user.info` and `user.rating` methods. Both answer with a
//! `{status, comment, result}` envelope; anything but `status == "OK"` is
//! treated as a failed fetch.

use super::{FetchOutcome, HttpClient, SourceAdapter};
use crate::error::SourceError;
use crate::models::{Metric, ProfileSnapshot, RawHistoryEntry, SourceTag};
use crate::pipeline::normalize;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

pub const CODEFORCES_API_URL: &str = "https://codeforces.com/api";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self, method: &str) -> Result<T, SourceError> {
        if self.status != "OK" {
            return Err(SourceError::SchemaMismatch(format!(
                "{} returned status {}: {}",
                method,
                self.status,
                self.comment.unwrap_or_default()
            )));
        }
        self.result
            .ok_or_else(|| SourceError::SchemaMismatch(format!("{} response has no result", method)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    rating: Option<f64>,
    max_rating: Option<f64>,
    rank: Option<String>,
    max_rank: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingChange {
    contest_name: Option<String>,
    rating_update_time_seconds: Option<i64>,
    new_rating: Option<f64>,
}

/// Codeforces rank title for a rating
pub fn rank_for_rating(rating: f64) -> &'static str {
    match rating {
        r if r < 1200.0 => "newbie",
        r if r < 1400.0 => "pupil",
        r if r < 1600.0 => "specialist",
        r if r < 1900.0 => "expert",
        r if r < 2100.0 => "candidate master",
        r if r < 2300.0 => "master",
        r if r < 2400.0 => "international master",
        r if r < 2600.0 => "grandmaster",
        r if r < 3000.0 => "international grandmaster",
        _ => "legendary grandmaster",
    }
}

/// Adapter for the Codeforces public API
pub struct CodeforcesAdapter {
    http: HttpClient,
    base_url: String,
}

impl CodeforcesAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: CODEFORCES_API_URL.to_string(),
        }
    }

    /// Point the adapter at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_live(&self, handle: &str) -> Result<ProfileSnapshot, SourceError> {
        let info_url = format!("{}/user.info", self.base_url);
        let rating_url = format!("{}/user.rating", self.base_url);
        let info_query = [("handles", handle)];
        let rating_query = [("handle", handle)];

        let (info, rating) = tokio::try_join!(
            self.http.get_json::<Envelope<Vec<UserInfo>>>(&info_url, &info_query),
            self.http.get_json::<Envelope<Vec<RatingChange>>>(&rating_url, &rating_query),
        )?;

        let user = info
            .into_result("user.info")?
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::SchemaMismatch("user.info returned no users".to_string()))?;
        let changes = rating.into_result("user.rating")?;

        Ok(build_snapshot(user, changes))
    }
}

fn build_snapshot(user: UserInfo, changes: Vec<RatingChange>) -> ProfileSnapshot {
    let contests = changes.len() as f64;
    let raw: Vec<RawHistoryEntry> = changes
        .into_iter()
        .map(|c| RawHistoryEntry::new(c.rating_update_time_seconds, c.new_rating).with_label(c.contest_name))
        .collect();

    let normalized = normalize(SourceTag::Codeforces, &raw);
    if normalized.dropped_total() > 0 {
        warn!(
            "Codeforces: dropped {} malformed rating changes: {:?}",
            normalized.dropped_total(),
            normalized.dropped
        );
    }

    let rank = match (user.rank.as_deref(), user.rating) {
        (Some(rank), _) => Metric::from_label(Some(rank)),
        (None, Some(rating)) => Metric::from(rank_for_rating(rating)),
        (None, None) => Metric::Unavailable,
    };

    let mut snapshot = ProfileSnapshot::new(
        SourceTag::Codeforces,
        Metric::from_option(user.rating),
        Metric::from_option(user.max_rating),
    )
    .with_secondary("rank", rank)
    .with_secondary("maxRank", Metric::from_label(user.max_rank.as_deref()))
    .with_secondary("contests", contests);

    snapshot.dropped_history_entries = normalized.dropped_total();
    snapshot.history = normalized.points;
    snapshot
}

#[async_trait]
impl SourceAdapter for CodeforcesAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::Codeforces
    }

    async fn fetch(&self, identity: &str) -> ProfileSnapshot {
        let outcome = FetchOutcome::from_attempt(self.fetch_live(identity).await, || self.degraded_snapshot());
        if !outcome.is_degraded() {
            info!("Codeforces profile fetched for {}", identity);
        }
        outcome.into_snapshot()
    }

    fn degraded_snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot::unavailable(SourceTag::Codeforces)
            .with_secondary("rank", Metric::Unavailable)
            .with_secondary("maxRank", Metric::Unavailable)
            .with_secondary("contests", 0.0)
    }
}
