//! Error types for the stat-guard library.
//!
//! Only configuration problems are raised as errors to the caller. Everything
//! that goes wrong while a test is being checked (missing columns, undefined
//! statistics, conditions that cannot be applied) is captured into the
//! test's [`TestResult`](crate::core::TestResult) instead, so a batch of tests
//! can always be fully evaluated and reported.

use crate::metrics::MetricError;
use thiserror::Error;

/// The main error type for the stat-guard library.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Conflicting or insufficient construction parameters.
    ///
    /// Raised by test builders and test plans before any data is touched.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from the statistics layer that surfaced outside of a check.
    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
///
/// This is the standard `Result` type used throughout the library.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GuardError::Configuration(_))
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::fmt::Error> for GuardError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Internal(format!("Failed to format output: {err}"))
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| attach_context(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| attach_context(&f(), e.into()))
    }
}

/// Prefixes the message while keeping configuration errors recognizable.
fn attach_context(msg: &str, error: GuardError) -> GuardError {
    match error {
        GuardError::Configuration(inner) => GuardError::Configuration(format!("{msg}: {inner}")),
        GuardError::Serialization(inner) => GuardError::Serialization(format!("{msg}: {inner}")),
        GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
        other => GuardError::Internal(format!("{msg}: {other}")),
    }
}
