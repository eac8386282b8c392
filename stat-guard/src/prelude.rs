//! Prelude for commonly used types and traits in stat-guard.

pub use crate::condition::{approx, Condition, ScalarValue};
pub use crate::core::{Test, TestResult, TestStatus, TestSuite, TestSuiteReport};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::metrics::StatisticsSource;
