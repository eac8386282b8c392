//! # stat-guard - statistical test evaluation for Rust
//!
//! stat-guard turns statistics about a dataset (and optionally a reference
//! dataset) into pass/fail/error verdicts. It does not compute statistics
//! itself: an external pipeline implements
//! [`StatisticsSource`](metrics::StatisticsSource) and stat-guard asks it for
//! each snapshot at most once.
//!
//! ## Quick Start
//!
//! ```rust
//! use stat_guard::prelude::*;
//! use stat_guard::condition::Condition;
//! use stat_guard::core::{TestStatus, TestSuite};
//! use stat_guard::data_quality::{FeatureStatistic, FeatureValueTest, MeanInNSigmasTest};
//! use stat_guard::metrics::{
//!     DataQualityMetricsResult, DatasetStats, FeatureStats, MetricResult, StatisticsSource,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Pipeline;
//!
//! impl StatisticsSource for Pipeline {
//!     fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
//!         Ok(DataQualityMetricsResult {
//!             features_stats: DatasetStats::new()
//!                 .with_feature("income", FeatureStats::numeric(61.0, 6.0)),
//!             reference_features_stats: Some(
//!                 DatasetStats::new().with_feature("income", FeatureStats::numeric(50.0, 5.0)),
//!             ),
//!             ..Default::default()
//!         })
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let source: Arc<dyn StatisticsSource> = Arc::new(Pipeline);
//!
//! let suite = TestSuite::builder("income_checks")
//!     .test(
//!         FeatureValueTest::builder(FeatureStatistic::Mean, "income")
//!             .condition(Condition::new().greater_than(40.0).less_than(70.0))
//!             .source(source.clone())
//!             .build()?,
//!     )
//!     .test(MeanInNSigmasTest::builder("income").source(source).build()?)
//!     .build();
//!
//! let report = suite.run();
//! assert_eq!(report.results[0].status(), TestStatus::Success);
//! assert_eq!(report.results[1].status(), TestStatus::Fail);
//! println!("{}", report.to_human()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! - A [`Condition`](condition::Condition) is a conjunction of predicates
//!   (`eq`, `not_eq`, `gt`, `gte`, `lt`, `lte`, `is_in`, `not_in`); equality
//!   bounds may carry a tolerance via [`approx`](condition::approx).
//! - A [`Test`](core::Test) computes one value from one metric and checks it
//!   against an explicit condition, or against one derived from reference
//!   data by its [`ThresholdPolicy`](core::ThresholdPolicy).
//! - Checking never fails: problems with the data become a
//!   [`TestResult`](core::TestResult) with status `ERROR`. Only invalid
//!   construction is returned as an error.
//! - A [`TestPlan`](config::TestPlan) builds a suite from JSON.
//!
//! ## Architecture
//!
//! - **`condition`**: scalar values, tolerant bounds and conditions
//! - **`metrics`**: statistic snapshots, the source trait and compute-once caching
//! - **`core`**: the test trait, evaluation, thresholds, results and suites
//! - **`data_quality`**: the built-in test families
//! - **`config`**: declarative test plans
//! - **`formatters`**: JSON, console and Markdown reports
//! - **`logging`**: logging presets and subscriber setup

pub mod condition;
pub mod config;
pub mod core;
pub mod data_quality;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod metrics;
pub mod prelude;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
