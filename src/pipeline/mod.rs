//! Reconciliation pipeline: normalize → select window → gap-fill and merge.
//!
//! Everything here is synchronous and pure; the orchestrator calls
//! [`reconcile`] once all adapters have returned.

pub mod merger;
pub mod normalizer;
pub mod window;

pub use merger::{fill_forward, merge};
pub use normalizer::{normalize, normalize_points, DropReason, NormalizedHistory};
pub use window::select_window;

use crate::error::PipelineError;
use crate::models::{HistoryPoint, ProfileSnapshot, SourceTag, UnifiedRecord, WindowPolicy};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Build the unified series from a set of snapshots
pub fn reconcile(
    snapshots: &BTreeMap<SourceTag, ProfileSnapshot>,
    policy: &WindowPolicy,
    today: NaiveDate,
) -> Result<Vec<UnifiedRecord>, PipelineError> {
    let histories: BTreeMap<SourceTag, Vec<HistoryPoint>> = snapshots
        .iter()
        .map(|(tag, snapshot)| (*tag, normalize_points(&snapshot.history)))
        .collect();

    let window = select_window(histories.values().map(Vec::as_slice), policy, today)?;

    merge(&histories, &window)
}
