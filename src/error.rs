use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reconciliation pipeline faults
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// A refresh was requested while another one is still loading
    #[error("A dashboard refresh is already in progress")]
    RunInProgress,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error came from the reconciliation pipeline
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(self, AppError::Pipeline(_))
    }

    /// Check if the run was skipped because another run holds the lock
    pub fn is_run_in_progress(&self) -> bool {
        matches!(self, AppError::RunInProgress)
    }
}

/// Failures inside a single source adapter.
///
/// These never leave the adapter: they are folded into a degraded snapshot.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Non-success HTTP status
    #[error("Unexpected status {0}")]
    Status(u16),

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Response parsed but an expected field was missing or had the wrong type
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl SourceError {
    /// Whether the error is a transport problem rather than a schema problem
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, SourceError::SchemaMismatch(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else if err.is_decode() {
            SourceError::SchemaMismatch(err.to_string())
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::SchemaMismatch(err.to_string())
    }
}

/// Faults in the normalizer/selector/merger stages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Window policy options contradict each other
    #[error("Invalid window policy: {0}")]
    InvalidWindowPolicy(String),

    /// Date arithmetic left the representable calendar
    #[error("Date arithmetic overflow: {0}")]
    DateOverflow(String),

    /// Merge was handed a window that is not strictly increasing
    #[error("Window is not strictly increasing at {0}")]
    UnorderedWindow(chrono::NaiveDate),
}
