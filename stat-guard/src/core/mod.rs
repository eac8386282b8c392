//! The test evaluation engine.
//!
//! A [`Test`] binds a condition (explicit, or derived by a
//! [`ThresholdPolicy`]) to a metric and turns the metric's value into a
//! [`TestResult`]. Tests are grouped into a [`TestSuite`] whose run yields a
//! [`TestSuiteReport`].

mod binding;
mod render;
mod result;
mod suite;
mod test;
mod threshold;

pub(crate) use binding::ensure_matches;
pub use binding::MetricBinding;
pub use render::RenderState;
pub use result::{SuiteSummary, TestResult, TestStatus, TestSuiteReport};
pub use suite::{TestSuite, TestSuiteBuilder};
pub use test::{evaluate, CheckError, Test, DATA_QUALITY_GROUP};
pub use threshold::{
    Baseline, ConditionMode, Threshold, ThresholdPolicy, DEFAULT_N_SIGMAS,
    MOST_COMMON_VALUE_SHARE_CEILING, REFERENCE_RELATIVE_TOLERANCE,
};
