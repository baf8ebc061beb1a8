pub mod orchestrator;
pub mod refresh_scheduler;

pub use orchestrator::Orchestrator;
pub use refresh_scheduler::{RefreshHandle, RefreshScheduler};
