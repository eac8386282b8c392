//! The interface to the external statistics pipeline.

use super::calculations::{ValueListCalculation, ValueQuantileCalculation, ValueRangeCalculation};
use super::errors::{MetricError, MetricResult};
use super::types::{
    CorrelationMethod, CorrelationMetricsResult, DataQualityMetricsResult,
    StabilityMetricsResult, ValueListMetricsResult, ValueQuantileMetricsResult,
    ValueRangeMetricsResult,
};
use std::fmt::Debug;

/// A producer of statistic snapshots for current and reference data.
///
/// stat-guard never computes statistics itself. Implement this trait over
/// whatever engine computes them and hand it to test builders, which wrap
/// each request in a compute-once [`CachedMetric`](super::CachedMetric).
/// Every method defaults to [`MetricError::Unsupported`], so a source only
/// implements the kinds it can provide.
///
/// # Example
///
/// ```rust
/// use stat_guard::metrics::{
///     DataQualityMetricsResult, DatasetStats, FeatureStats, MetricResult, StatisticsSource,
/// };
///
/// #[derive(Debug)]
/// struct Snapshot;
///
/// impl StatisticsSource for Snapshot {
///     fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
///         Ok(DataQualityMetricsResult {
///             features_stats: DatasetStats::new()
///                 .with_feature("income", FeatureStats::numeric(52.0, 4.0)),
///             ..Default::default()
///         })
///     }
/// }
/// ```
pub trait StatisticsSource: Send + Sync + Debug {
    /// Per-feature statistics for current and, if available, reference data.
    fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
        Err(MetricError::unsupported("data_quality"))
    }

    /// Conflict counts for target and prediction columns.
    fn stability(&self) -> MetricResult<StabilityMetricsResult> {
        Err(MetricError::unsupported("stability"))
    }

    /// Correlation figures computed with `method`.
    fn correlations(&self, _method: CorrelationMethod) -> MetricResult<CorrelationMetricsResult> {
        Err(MetricError::unsupported("correlations"))
    }

    /// Counts and shares of values inside and outside an interval.
    fn value_range(
        &self,
        _calculation: &ValueRangeCalculation,
    ) -> MetricResult<ValueRangeMetricsResult> {
        Err(MetricError::unsupported("value_range"))
    }

    /// Counts and shares of values inside and outside a value list.
    fn value_list(&self, _calculation: &ValueListCalculation) -> MetricResult<ValueListMetricsResult> {
        Err(MetricError::unsupported("value_list"))
    }

    /// A quantile of one column.
    fn value_quantile(
        &self,
        _calculation: &ValueQuantileCalculation,
    ) -> MetricResult<ValueQuantileMetricsResult> {
        Err(MetricError::unsupported("value_quantile"))
    }
}
