use super::source::SourceTag;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated rating observation from a source, after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub rating: f64,
    pub source: SourceTag,
    pub contest_label: Option<String>,
}

impl HistoryPoint {
    pub fn new(date: NaiveDate, rating: f64, source: SourceTag) -> Self {
        Self {
            date,
            rating,
            source,
            contest_label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.contest_label = Some(label.into());
        self
    }
}

/// Date as reported by an upstream platform
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// Seconds since the unix epoch (UTC)
    UnixSeconds(i64),
    /// Any textual date or datetime representation
    Text(String),
    Missing,
}

/// Rating as reported by an upstream platform
#[derive(Debug, Clone, PartialEq)]
pub enum RawRating {
    Number(f64),
    /// Some platforms send ratings as strings
    Text(String),
    Missing,
}

impl From<Option<f64>> for RawRating {
    fn from(value: Option<f64>) -> Self {
        value.map(RawRating::Number).unwrap_or(RawRating::Missing)
    }
}

impl From<Option<i64>> for RawDate {
    fn from(value: Option<i64>) -> Self {
        value.map(RawDate::UnixSeconds).unwrap_or(RawDate::Missing)
    }
}

impl From<Option<String>> for RawDate {
    fn from(value: Option<String>) -> Self {
        value.map(RawDate::Text).unwrap_or(RawDate::Missing)
    }
}

/// An unvalidated history entry straight off the wire
#[derive(Debug, Clone, PartialEq)]
pub struct RawHistoryEntry {
    pub date: RawDate,
    pub rating: RawRating,
    pub contest_label: Option<String>,
}

impl RawHistoryEntry {
    pub fn new(date: impl Into<RawDate>, rating: impl Into<RawRating>) -> Self {
        Self {
            date: date.into(),
            rating: rating.into(),
            contest_label: None,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.contest_label = label;
        self
    }
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        RawDate::Text(value.to_string())
    }
}

impl From<f64> for RawRating {
    fn from(value: f64) -> Self {
        RawRating::Number(value)
    }
}
