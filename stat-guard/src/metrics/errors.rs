//! Error types for the statistics layer.

use thiserror::Error;

/// Result type for metric operations.
pub type MetricResult<T> = Result<T, MetricError>;

/// Errors that can occur while obtaining statistics from a source.
///
/// `Clone` so a cached failure can be handed out on every access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// The requested column does not exist in the dataset.
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The source does not provide this kind of metric.
    #[error("Metric '{metric}' is not supported by this statistics source")]
    Unsupported { metric: String },

    /// The source knows the metric but cannot provide it right now.
    #[error("Metric '{metric}' is unavailable: {reason}")]
    Unavailable { metric: String, reason: String },

    /// The statistics pipeline failed while computing the metric.
    #[error("Failed to compute metric: {0}")]
    Computation(String),

    /// The metric was requested with invalid parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl MetricError {
    /// Creates a column-not-found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates an unsupported-metric error.
    pub fn unsupported(metric: impl Into<String>) -> Self {
        Self::Unsupported {
            metric: metric.into(),
        }
    }

    /// Creates an unavailable-metric error.
    pub fn unavailable(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    /// Creates a computation error with the given message.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Creates an invalid configuration error with the given message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
