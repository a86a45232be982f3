//! Reporter error types

/// Reporter error types
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    // Store errors
    /// The store (or its bucket) could not be reached or resolved.
    /// Fatal when raised from [`RiakReporterBuilder::build`](crate::RiakReporterBuilder::build).
    #[error("connection error: {0}")]
    Connection(String),

    /// A single `put` failed. Dropped by the reporter, never retried.
    #[error("storage write failed for '{key}': {message}")]
    StorageWrite { key: String, message: String },

    // Data errors
    /// A metric's state cannot be encoded (e.g. a non-finite statistic).
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Registry errors
    #[error("metric '{name}' is already registered as a {existing}")]
    MetricConflict { name: String, existing: &'static str },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ReporterError {
    /// Short, stable label used for telemetry and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ReporterError::Connection(_) => "connection",
            ReporterError::StorageWrite { .. } => "storage_write",
            ReporterError::Serialization(_) | ReporterError::Json(_) => "serialization",
            ReporterError::MetricConflict { .. } => "metric_conflict",
            ReporterError::Configuration(_) => "configuration",
        }
    }
}

/// Result type alias for reporter operations
pub type Result<T> = std::result::Result<T, ReporterError>;
