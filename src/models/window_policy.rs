use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Longest lookback accepted, roughly a century
pub const MAX_LOOKBACK_DAYS: u32 = 36_525;

/// How far back the window reaches from today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    Days(u32),
    All,
}

/// Which dates inside the clipped range make up the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowGranularity {
    /// Only dates on which at least one source reported a point
    Observed,
    /// Every calendar day between the first and last qualifying date
    Daily,
}

impl WindowGranularity {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "observed" => Ok(WindowGranularity::Observed),
            "daily" => Ok(WindowGranularity::Daily),
            _ => Err(format!("Invalid WINDOW_GRANULARITY: {}. Must be observed or daily", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowGranularity::Observed => "observed",
            WindowGranularity::Daily => "daily",
        }
    }
}

/// Window selection options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    pub lookback: Lookback,
    pub exclude_future: bool,
    pub granularity: WindowGranularity,
}

impl WindowPolicy {
    /// Every observed date up to today
    pub fn all_time() -> Self {
        Self {
            lookback: Lookback::All,
            exclude_future: true,
            granularity: WindowGranularity::Observed,
        }
    }

    /// Trailing `days` up to and including today
    pub fn trailing_days(days: u32) -> Self {
        Self {
            lookback: Lookback::Days(days),
            ..Self::all_time()
        }
    }

    pub fn daily(mut self) -> Self {
        self.granularity = WindowGranularity::Daily;
        self
    }

    /// Reject policies that cannot describe a window.
    ///
    /// A day lookback always ends today, so `exclude_future` is redundant
    /// with it rather than contradictory.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if let Lookback::Days(days) = self.lookback {
            if days > MAX_LOOKBACK_DAYS {
                return Err(PipelineError::InvalidWindowPolicy(format!(
                    "lookback of {} days exceeds the maximum of {}",
                    days, MAX_LOOKBACK_DAYS
                )));
            }
        }
        Ok(())
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::trailing_days(365)
    }
}
