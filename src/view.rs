//! Presentation boundary.
//!
//! Flattens a [`DashboardState`] into the shape a UI renders: loading/error
//! flags, one card per platform and the chart series. Unavailable values
//! render as "N/A" on their own card without affecting the others.

use crate::error::AppResult;
use crate::models::{DashboardState, Metric, ProfileSnapshot, SourceTag, UnifiedRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const LOADING_MESSAGE: &str = "Loading Unified CP Data…";
pub const ERROR_MESSAGE: &str = "Could not load dashboard data.";

/// One platform card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformCard {
    pub source: SourceTag,
    pub title: &'static str,
    pub headline: String,
    pub caption: String,
    pub subtitle: String,
    pub chips: Vec<String>,
    pub profile_url: String,
    pub degraded: bool,
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub loading: bool,
    pub error: bool,
    pub message: Option<&'static str>,
    pub identity: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub cards: Vec<PlatformCard>,
    pub chart: Vec<UnifiedRecord>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let empty = Self {
            loading: false,
            error: false,
            message: None,
            identity: None,
            fetched_at: None,
            cards: Vec::new(),
            chart: Vec::new(),
        };

        match state {
            DashboardState::Idle => empty,
            DashboardState::Loading => Self {
                loading: true,
                message: Some(LOADING_MESSAGE),
                ..empty
            },
            DashboardState::Failed(_) => Self {
                error: true,
                message: Some(ERROR_MESSAGE),
                ..empty
            },
            DashboardState::Ready(result) => Self {
                identity: Some(result.identity.clone()),
                fetched_at: Some(result.fetched_at),
                cards: result
                    .snapshots
                    .values()
                    .map(|snapshot| card(snapshot, &result.identity))
                    .collect(),
                chart: result.unified_history.clone(),
                ..empty
            },
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Keep only metrics that carry a value, rendered with a prefix
fn chip(prefix: &str, metric: &Metric) -> Option<String> {
    metric.is_available().then(|| format!("{}{}", prefix, metric).trim().to_string())
}

fn card(snapshot: &ProfileSnapshot, identity: &str) -> PlatformCard {
    let (caption, subtitle, chips) = match snapshot.source {
        SourceTag::Codeforces => (
            snapshot.secondary("rank").to_string(),
            format!("Peak: {}", snapshot.peak_metric),
            [chip("", snapshot.secondary("rank")), chip("Max ", snapshot.secondary("maxRank"))]
                .into_iter()
                .flatten()
                .collect(),
        ),
        SourceTag::LeetCode => (
            "Total Solved".to_string(),
            format!("Contest Rating: {}", snapshot.peak_metric),
            [
                chip("Easy ", snapshot.secondary("easy")),
                chip("Medium ", snapshot.secondary("medium")),
                chip("Hard ", snapshot.secondary("hard")),
            ]
            .into_iter()
            .flatten()
            .collect(),
        ),
        SourceTag::CodeChef => (
            snapshot.secondary("stars").to_string(),
            format!("Peak: {}", snapshot.peak_metric),
            [
                chip("", snapshot.secondary("division")),
                chip("Contests ", snapshot.secondary("contestsAttended")),
            ]
            .into_iter()
            .flatten()
            .collect(),
        ),
    };

    PlatformCard {
        source: snapshot.source,
        title: snapshot.source.display_name(),
        headline: snapshot.current_metric.to_string(),
        caption,
        subtitle,
        chips,
        profile_url: snapshot.source.profile_url(identity),
        degraded: snapshot.degraded,
    }
}
