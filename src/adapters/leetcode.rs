//! LeetCode adapter.
//!
//! LeetCode is the problem-solving tracker: its headline number is the
//! solved count, while contest ratings form its history.

use super::{FetchOutcome, HttpClient, SourceAdapter};
use crate::error::SourceError;
use crate::models::{Metric, ProfileSnapshot, RawHistoryEntry, RawRating, SourceTag};
use crate::pipeline::normalize;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

pub const LEETCODE_API_URL: &str = "https://leetcode-api-0dvi.onrender.com";

/// API versions disagree on field names and some send both spellings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    total_solved: Option<f64>,
    solved_problem: Option<f64>,
    easy: Option<f64>,
    easy_solved: Option<f64>,
    medium: Option<f64>,
    medium_solved: Option<f64>,
    hard: Option<f64>,
    hard_solved: Option<f64>,
    rating: Option<f64>,
    contest_rating: Option<f64>,
    attended_contests_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<ContestEntry>,
}

#[derive(Debug, Deserialize)]
struct ContestEntry {
    rating: Option<f64>,
    contest: Option<Contest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contest {
    title: Option<String>,
    start_time: Option<i64>,
}

/// Adapter for the community LeetCode stats API
pub struct LeetCodeAdapter {
    http: HttpClient,
    base_url: String,
}

impl LeetCodeAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: LEETCODE_API_URL.to_string(),
        }
    }

    /// Point the adapter at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_live(&self, handle: &str) -> Result<ProfileSnapshot, SourceError> {
        let stats_url = format!("{}/stats/{}", self.base_url, handle);
        let history_url = format!("{}/history/{}", self.base_url, handle);

        let (stats, history) = tokio::try_join!(
            self.http.get_json::<Stats>(&stats_url, &[]),
            self.http.get_json::<HistoryResponse>(&history_url, &[]),
        )?;

        build_snapshot(stats, history.history)
    }
}

fn build_snapshot(stats: Stats, contests: Vec<ContestEntry>) -> Result<ProfileSnapshot, SourceError> {
    let total_solved = stats
        .total_solved
        .or(stats.solved_problem)
        .ok_or_else(|| SourceError::SchemaMismatch("stats response has no totalSolved".to_string()))?;

    let attended = contests.len() as f64;
    let raw: Vec<RawHistoryEntry> = contests
        .into_iter()
        .map(|entry| {
            let (start_time, title) = match entry.contest {
                Some(contest) => (contest.start_time, contest.title),
                None => (None, None),
            };
            RawHistoryEntry::new(start_time, RawRating::from(entry.rating.map(f64::round))).with_label(title)
        })
        .collect();

    let normalized = normalize(SourceTag::LeetCode, &raw);
    if normalized.dropped_total() > 0 {
        warn!(
            "LeetCode: dropped {} malformed contest entries: {:?}",
            normalized.dropped_total(),
            normalized.dropped
        );
    }

    let contest_rating = stats.rating.or(stats.contest_rating).map(f64::round);
    let peak = normalized
        .points
        .iter()
        .map(|p| p.rating)
        .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r))))
        .or(contest_rating);

    let mut snapshot = ProfileSnapshot::new(SourceTag::LeetCode, Metric::from(total_solved), Metric::from_option(peak))
        .with_secondary("easy", stats.easy.or(stats.easy_solved))
        .with_secondary("medium", stats.medium.or(stats.medium_solved))
        .with_secondary("hard", stats.hard.or(stats.hard_solved))
        .with_secondary("contestRating", contest_rating)
        .with_secondary("contestsAttended", stats.attended_contests_count.or(Some(attended)));

    snapshot.dropped_history_entries = normalized.dropped_total();
    snapshot.history = normalized.points;
    Ok(snapshot)
}

#[async_trait]
impl SourceAdapter for LeetCodeAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::LeetCode
    }

    async fn fetch(&self, identity: &str) -> ProfileSnapshot {
        let outcome = FetchOutcome::from_attempt(self.fetch_live(identity).await, || self.degraded_snapshot());
        if !outcome.is_degraded() {
            info!("LeetCode profile fetched for {}", identity);
        }
        outcome.into_snapshot()
    }

    fn degraded_snapshot(&self) -> ProfileSnapshot {
        ["easy", "medium", "hard", "contestRating", "contestsAttended"]
            .iter()
            .fold(ProfileSnapshot::unavailable(SourceTag::LeetCode), |snapshot, key| {
                snapshot.with_secondary(key, Metric::Unavailable)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(json: &str) -> Stats {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_snapshot_from_stats_and_history() {
        let history: HistoryResponse = serde_json::from_str(
            r#"{"history":[
                {"rating":1510.6,"contest":{"title":"Weekly 380","startTime":1704595200}},
                {"rating":1650.2,"contest":{"title":"Weekly 381","startTime":1705200000}},
                {"rating":1590.0,"contest":{"title":"Weekly 382"}}
            ]}"#,
        )
        .unwrap();
        let stats = stats(r#"{"totalSolved":420,"easySolved":200,"mediumSolved":180,"hardSolved":40,"rating":1601.7}"#);

        let snapshot = build_snapshot(stats, history.history).unwrap();

        assert_eq!(snapshot.current_metric, Metric::Value(420.0));
        assert_eq!(snapshot.peak_metric, Metric::Value(1650.0));
        assert_eq!(snapshot.secondary("medium"), &Metric::Value(180.0));
        assert_eq!(snapshot.secondary("contestRating"), &Metric::Value(1602.0));
        assert_eq!(snapshot.secondary("contestsAttended"), &Metric::Value(3.0));
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0].rating, 1511.0);
        assert_eq!(snapshot.dropped_history_entries, 1);
    }

    #[test]
    fn test_aggregate_totals_without_history() {
        let stats = stats(r#"{"totalSolved":87,"easy":50,"medium":30,"hard":7,"attendedContestsCount":0}"#);

        let snapshot = build_snapshot(stats, vec![]).unwrap();

        assert_eq!(snapshot.current_metric, Metric::Value(87.0));
        assert_eq!(snapshot.peak_metric, Metric::Unavailable);
        assert_eq!(snapshot.secondary("contestsAttended"), &Metric::Value(0.0));
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn test_payload_with_both_spellings() {
        let stats = stats(
            r#"{"totalSolved":300,"solvedProblem":300,"easy":120,"easySolved":120,
                "medium":150,"mediumSolved":150,"hard":30,"hardSolved":30,
                "rating":1710.4,"contestRating":1710.4}"#,
        );

        let snapshot = build_snapshot(stats, vec![]).unwrap();

        assert_eq!(snapshot.current_metric, Metric::Value(300.0));
        assert_eq!(snapshot.secondary("easy"), &Metric::Value(120.0));
        assert_eq!(snapshot.secondary("hard"), &Metric::Value(30.0));
        assert_eq!(snapshot.secondary("contestRating"), &Metric::Value(1710.0));
    }

    #[test]
    fn test_missing_total_is_schema_mismatch() {
        let stats = stats(r#"{"status":"error","message":"user does not exist"}"#);
        assert!(matches!(build_snapshot(stats, vec![]), Err(SourceError::SchemaMismatch(_))));
    }

    #[test]
    fn test_history_field_is_optional() {
        let history: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(history.history.is_empty());
    }

    #[test]
    fn test_degraded_snapshot_has_sentinels() {
        let snapshot = LeetCodeAdapter::new(HttpClient::default()).degraded_snapshot();
        assert!(snapshot.degraded);
        assert_eq!(snapshot.current_metric, Metric::Unavailable);
        assert_eq!(snapshot.secondary("hard"), &Metric::Unavailable);
        assert_eq!(snapshot.secondary_metrics.len(), 5);
    }
}
