//! Domain models for the dashboard.
//!
//! Platform snapshots, rating history, the unified series and the
//! window policy that shapes it.

pub mod dashboard;
pub mod history;
pub mod snapshot;
pub mod source;
pub mod window_policy;

// Re-export all models for convenient access
pub use dashboard::{DashboardResult, DashboardState, UnifiedRecord};
pub use history::{HistoryPoint, RawDate, RawHistoryEntry, RawRating};
pub use snapshot::{Metric, ProfileSnapshot};
pub use source::SourceTag;
pub use window_policy::{Lookback, WindowGranularity, WindowPolicy, MAX_LOOKBACK_DAYS};
