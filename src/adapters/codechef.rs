//! CodeChef adapter.
//!
//! The community CodeChef API is the least reliable of the three, so this
//! adapter carries a static fallback dataset that stands in when the live
//! call fails. Division and star tier are derived from the current rating.

use super::{FetchOutcome, HttpClient, SourceAdapter};
use crate::error::SourceError;
use crate::models::{Metric, ProfileSnapshot, RawHistoryEntry, RawRating, SourceTag};
use crate::pipeline::normalize;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

pub const CODECHEF_API_URL: &str = "https://codechef-api.vercel.app/handle";

/// Ratings arrive as numbers or as numeric strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn raw_rating(value: Option<NumberOrText>) -> RawRating {
    match value {
        Some(NumberOrText::Number(v)) => RawRating::Number(v),
        Some(NumberOrText::Text(s)) => RawRating::Text(s),
        None => RawRating::Missing,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    success: Option<bool>,
    rating: Option<f64>,
    current_rating: Option<f64>,
    max_rating: Option<f64>,
    highest_rating: Option<f64>,
    contests: Option<f64>,
    #[serde(default)]
    rating_data: Vec<RatingEntry>,
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    end_date: Option<String>,
    rating: Option<NumberOrText>,
    name: Option<String>,
}

/// CodeChef division for a rating
pub fn division_for_rating(rating: f64) -> &'static str {
    if rating >= 2000.0 {
        "Div 1"
    } else if rating >= 1600.0 {
        "Div 2"
    } else {
        "Div 3"
    }
}

/// CodeChef star tier for a rating
pub fn stars_for_rating(rating: f64) -> &'static str {
    match rating {
        r if r < 1400.0 => "1★",
        r if r < 1600.0 => "2★",
        r if r < 1800.0 => "3★",
        r if r < 2000.0 => "4★",
        r if r < 2200.0 => "5★",
        r if r < 2500.0 => "6★",
        _ => "7★",
    }
}

/// Manually maintained profile figures shown while the API is down
#[derive(Debug, Clone, PartialEq)]
pub struct CodeChefFallback {
    pub division: String,
    pub contests_attended: u32,
    pub current_rating: f64,
    pub peak_rating: f64,
    pub stars: String,
}

impl Default for CodeChefFallback {
    fn default() -> Self {
        Self {
            division: "Div 3".to_string(),
            contests_attended: 31,
            current_rating: 1480.0,
            peak_rating: 1516.0,
            stars: "2★".to_string(),
        }
    }
}

impl CodeChefFallback {
    fn to_snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot::new(
            SourceTag::CodeChef,
            Metric::from(self.current_rating),
            Metric::from(self.peak_rating),
        )
        .with_secondary("division", self.division.as_str())
        .with_secondary("stars", self.stars.as_str())
        .with_secondary("contestsAttended", f64::from(self.contests_attended))
        .into_degraded()
    }
}

/// Adapter for the community CodeChef API
pub struct CodeChefAdapter {
    http: HttpClient,
    base_url: String,
    fallback: Option<CodeChefFallback>,
}

impl CodeChefAdapter {
    /// Create an adapter with the default fallback dataset
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: CODECHEF_API_URL.to_string(),
            fallback: Some(CodeChefFallback::default()),
        }
    }

    /// Point the adapter at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the fallback dataset
    pub fn with_fallback(mut self, fallback: CodeChefFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Use sentinel values instead of a fallback dataset
    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }

    async fn fetch_live(&self, handle: &str) -> Result<ProfileSnapshot, SourceError> {
        let url = format!("{}/{}", self.base_url, handle);
        let profile = self.http.get_json::<Profile>(&url, &[]).await?;
        build_snapshot(profile)
    }
}

fn build_snapshot(profile: Profile) -> Result<ProfileSnapshot, SourceError> {
    if profile.success == Some(false) {
        return Err(SourceError::SchemaMismatch("API reported success=false".to_string()));
    }

    let rating = profile
        .current_rating
        .or(profile.rating)
        .ok_or_else(|| SourceError::SchemaMismatch("response has no rating".to_string()))?;

    let contests = profile.contests.unwrap_or(profile.rating_data.len() as f64);
    let raw: Vec<RawHistoryEntry> = profile
        .rating_data
        .into_iter()
        .map(|entry| RawHistoryEntry::new(entry.end_date, raw_rating(entry.rating)).with_label(entry.name))
        .collect();

    let normalized = normalize(SourceTag::CodeChef, &raw);
    if normalized.dropped_total() > 0 {
        warn!(
            "CodeChef: dropped {} malformed rating entries: {:?}",
            normalized.dropped_total(),
            normalized.dropped
        );
    }

    let peak = profile.highest_rating.or(profile.max_rating);
    let mut snapshot = ProfileSnapshot::new(SourceTag::CodeChef, Metric::from(rating), Metric::from_option(peak))
        .with_secondary("division", division_for_rating(rating))
        .with_secondary("stars", stars_for_rating(rating))
        .with_secondary("contestsAttended", contests);

    snapshot.dropped_history_entries = normalized.dropped_total();
    snapshot.history = normalized.points;
    Ok(snapshot)
}

#[async_trait]
impl SourceAdapter for CodeChefAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::CodeChef
    }

    async fn fetch(&self, identity: &str) -> ProfileSnapshot {
        let outcome = FetchOutcome::from_attempt(self.fetch_live(identity).await, || self.degraded_snapshot());
        if !outcome.is_degraded() {
            info!("CodeChef profile fetched for {}", identity);
        } else if self.fallback.is_some() {
            warn!("CodeChef: serving manual fallback data for {}", identity);
        }
        outcome.into_snapshot()
    }

    fn degraded_snapshot(&self) -> ProfileSnapshot {
        match &self.fallback {
            Some(fallback) => fallback.to_snapshot(),
            None => ProfileSnapshot::unavailable(SourceTag::CodeChef)
                .with_secondary("division", Metric::Unavailable)
                .with_secondary("stars", Metric::Unavailable)
                .with_secondary("contestsAttended", Metric::Unavailable),
        }
    }
}
