//! CP Dashboard Library
//!
//! Fetches a competitive programmer's Codeforces, LeetCode and CodeChef
//! profiles, reconciles their rating histories onto one date axis and
//! exposes the result for rendering.

pub mod adapters;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod view;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::{Orchestrator, RefreshHandle, RefreshScheduler};
pub use view::DashboardView;
