use super::snapshot::ProfileSnapshot;
use super::source::SourceTag;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// One window date with one optional value per source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub date: NaiveDate,
    pub values: BTreeMap<SourceTag, Option<f64>>,
}

impl UnifiedRecord {
    /// Record with every source absent
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            values: SourceTag::ALL.iter().map(|tag| (*tag, None)).collect(),
        }
    }

    /// Value for a source on this date, `None` when no observation exists yet
    pub fn value(&self, source: SourceTag) -> Option<f64> {
        self.values.get(&source).copied().flatten()
    }
}

/// Consolidated output of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResult {
    pub run_id: Uuid,
    pub identity: String,
    pub snapshots: BTreeMap<SourceTag, ProfileSnapshot>,
    pub unified_history: Vec<UnifiedRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardResult {
    pub fn snapshot(&self, source: SourceTag) -> Option<&ProfileSnapshot> {
        self.snapshots.get(&source)
    }

    /// Sources whose snapshot came from a fallback path
    pub fn degraded_sources(&self) -> Vec<SourceTag> {
        self.snapshots
            .values()
            .filter(|s| s.degraded)
            .map(|s| s.source)
            .collect()
    }
}

/// Orchestrator lifecycle as seen by the presentation layer
#[derive(Debug, Clone)]
pub enum DashboardState {
    Idle,
    Loading,
    Ready(Arc<DashboardResult>),
    Failed(String),
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DashboardState::Failed(_))
    }

    /// The ready result, if any
    pub fn result(&self) -> Option<&Arc<DashboardResult>> {
        match self {
            DashboardState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardState::Idle => "idle",
            DashboardState::Loading => "loading",
            DashboardState::Ready(_) => "ready",
            DashboardState::Failed(_) => "failed",
        }
    }
}
