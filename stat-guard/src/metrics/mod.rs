//! Metric accessors: the contract between tests and the statistics pipeline.
//!
//! A [`StatisticsSource`] produces immutable snapshots; a [`CachedMetric`]
//! asks for one snapshot at most once and hands out shared references to it.
//! Each [`MetricCalculation`] names the parameters of one metric kind.

mod cached;
mod calculations;
mod errors;
mod source;
mod types;

pub use cached::CachedMetric;
pub use calculations::{
    CorrelationCalculation, CorrelationMetrics, DataQualityCalculation, DataQualityMetrics,
    MetricCalculation, StabilityCalculation, StabilityMetrics, ValueListCalculation,
    ValueListMetrics, ValueQuantileCalculation, ValueQuantileMetrics, ValueRangeCalculation,
    ValueRangeMetrics,
};
pub use errors::{MetricError, MetricResult};
pub use source::StatisticsSource;
pub use types::{
    CorrelationMethod, CorrelationMetricsResult, DataQualityMetricsResult, DatasetStats,
    FeatureStats, StabilityMetricsResult, ValueCounts, ValueListMetricsResult,
    ValueQuantileMetricsResult, ValueRangeMetricsResult,
};
