use super::history::HistoryPoint;
use super::source::SourceTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A headline or auxiliary value on a platform card.
///
/// Serializes untagged: numbers as numbers, labels as strings, `Unavailable` as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    Label(String),
    Unavailable,
}

impl Metric {
    /// Build from an optional number, mapping `None` and non-finite values to `Unavailable`
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Metric::Value(v),
            _ => Metric::Unavailable,
        }
    }

    /// Build from an optional label, mapping `None` and blank strings to `Unavailable`
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(l) if !l.trim().is_empty() => Metric::Label(l.trim().to_string()),
            _ => Metric::Unavailable,
        }
    }

    /// Numeric value if present
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Metric::Unavailable)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::from_option(Some(value))
    }
}

impl From<&str> for Metric {
    fn from(label: &str) -> Self {
        Metric::from_label(Some(label))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Metric::Value(v) => write!(f, "{:.2}", v),
            Metric::Label(l) => f.write_str(l),
            Metric::Unavailable => f.write_str("N/A"),
        }
    }
}

/// One adapter's complete output for one fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub source: SourceTag,
    pub current_metric: Metric,
    pub peak_metric: Metric,
    pub secondary_metrics: BTreeMap<String, Metric>,
    pub history: Vec<HistoryPoint>,
    pub degraded: bool,
    pub dropped_history_entries: usize,
}

static UNAVAILABLE: Metric = Metric::Unavailable;

impl ProfileSnapshot {
    /// Create a live snapshot with no secondary metrics or history yet
    pub fn new(source: SourceTag, current_metric: Metric, peak_metric: Metric) -> Self {
        Self {
            source,
            current_metric,
            peak_metric,
            secondary_metrics: BTreeMap::new(),
            history: Vec::new(),
            degraded: false,
            dropped_history_entries: 0,
        }
    }

    /// Sentinel snapshot used when a source cannot be reached and has no fallback data
    pub fn unavailable(source: SourceTag) -> Self {
        Self {
            degraded: true,
            ..Self::new(source, Metric::Unavailable, Metric::Unavailable)
        }
    }

    /// Add a labeled auxiliary metric
    pub fn with_secondary(mut self, key: &str, metric: impl Into<Metric>) -> Self {
        self.secondary_metrics.insert(key.to_string(), metric.into());
        self
    }

    /// Mark the snapshot as produced by a fallback path
    pub fn into_degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    /// Look up an auxiliary metric by key
    pub fn secondary(&self, key: &str) -> &Metric {
        self.secondary_metrics.get(key).unwrap_or(&UNAVAILABLE)
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        Metric::from_option(value)
    }
}
