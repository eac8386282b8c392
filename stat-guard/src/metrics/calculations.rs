//! Metric parameter sets and the source call each one makes.

use super::cached::CachedMetric;
use super::errors::MetricResult;
use super::source::StatisticsSource;
use super::types::{
    CorrelationMethod, CorrelationMetricsResult, DataQualityMetricsResult,
    StabilityMetricsResult, ValueListMetricsResult, ValueQuantileMetricsResult,
    ValueRangeMetricsResult,
};
use crate::condition::ScalarValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The parameters of one metric and how to obtain it from a source.
pub trait MetricCalculation: Send + Sync + Debug {
    /// The snapshot type this metric produces.
    type Output: Send + Sync + Debug;

    /// Returns the metric name used in logs and errors.
    fn name(&self) -> &str;

    /// Requests the snapshot from `source`.
    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output>;
}

/// Per-feature statistics of the whole dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQualityCalculation;

impl MetricCalculation for DataQualityCalculation {
    type Output = DataQualityMetricsResult;

    fn name(&self) -> &str {
        "data_quality"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.data_quality()
    }
}

/// Conflict counts of target and prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StabilityCalculation;

impl MetricCalculation for StabilityCalculation {
    type Output = StabilityMetricsResult;

    fn name(&self) -> &str {
        "stability"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.stability()
    }
}

/// Correlation figures for one method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrelationCalculation {
    pub method: CorrelationMethod,
}

impl CorrelationCalculation {
    pub fn new(method: CorrelationMethod) -> Self {
        Self { method }
    }
}

impl MetricCalculation for CorrelationCalculation {
    type Output = CorrelationMetricsResult;

    fn name(&self) -> &str {
        "correlations"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.correlations(self.method)
    }
}

/// Values of `column` inside `[left, right]`; an absent edge is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeCalculation {
    pub column: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl ValueRangeCalculation {
    pub fn new(column: impl Into<String>, left: Option<f64>, right: Option<f64>) -> Self {
        Self {
            column: column.into(),
            left,
            right,
        }
    }
}

impl MetricCalculation for ValueRangeCalculation {
    type Output = ValueRangeMetricsResult;

    fn name(&self) -> &str {
        "value_range"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.value_range(self)
    }
}

/// Values of `column` that belong to `values`.
///
/// With no list, the source compares against the reference data's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueListCalculation {
    pub column: String,
    pub values: Option<Vec<ScalarValue>>,
}

impl ValueListCalculation {
    pub fn new(column: impl Into<String>, values: Option<Vec<ScalarValue>>) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }
}

impl MetricCalculation for ValueListCalculation {
    type Output = ValueListMetricsResult;

    fn name(&self) -> &str {
        "value_list"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.value_list(self)
    }
}

/// The `quantile` of `column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueQuantileCalculation {
    pub column: String,
    pub quantile: f64,
}

impl ValueQuantileCalculation {
    pub fn new(column: impl Into<String>, quantile: f64) -> Self {
        Self {
            column: column.into(),
            quantile,
        }
    }
}

impl MetricCalculation for ValueQuantileCalculation {
    type Output = ValueQuantileMetricsResult;

    fn name(&self) -> &str {
        "value_quantile"
    }

    fn compute(&self, source: &dyn StatisticsSource) -> MetricResult<Self::Output> {
        source.value_quantile(self)
    }
}

pub type DataQualityMetrics = CachedMetric<DataQualityCalculation>;
pub type StabilityMetrics = CachedMetric<StabilityCalculation>;
pub type CorrelationMetrics = CachedMetric<CorrelationCalculation>;
pub type ValueRangeMetrics = CachedMetric<ValueRangeCalculation>;
pub type ValueListMetrics = CachedMetric<ValueListCalculation>;
pub type ValueQuantileMetrics = CachedMetric<ValueQuantileCalculation>;
