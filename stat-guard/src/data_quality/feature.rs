//! Tests over per-feature summary statistics.

use crate::condition::{format_number, Condition, ScalarValue};
use crate::core::{Baseline, CheckError, MetricBinding, Test, Threshold, ThresholdPolicy};
use crate::error::Result;
use crate::metrics::{
    CachedMetric, DataQualityCalculation, DataQualityMetrics, FeatureStats, StatisticsSource,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The feature statistic a [`FeatureValueTest`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatistic {
    Min,
    Max,
    Mean,
    Median,
    Std,
    UniqueCount,
    UniqueShare,
    MostCommonValueShare,
}

impl FeatureStatistic {
    pub fn test_name(&self) -> &'static str {
        match self {
            FeatureStatistic::Min => "Test a feature min value",
            FeatureStatistic::Max => "Test a feature max value",
            FeatureStatistic::Mean => "Test a feature mean value",
            FeatureStatistic::Median => "Test a feature median value",
            FeatureStatistic::Std => "Test a feature std value",
            FeatureStatistic::UniqueCount => "Test a feature number of unique values",
            FeatureStatistic::UniqueShare => "Test a feature share of unique values",
            FeatureStatistic::MostCommonValueShare => "Test Share of the Most Common Value",
        }
    }

    /// Returns the default-threshold policy of this statistic.
    pub fn policy(&self) -> ThresholdPolicy {
        match self {
            FeatureStatistic::MostCommonValueShare => ThresholdPolicy::reference_relative(),
            _ => ThresholdPolicy::ExplicitOnly,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FeatureStatistic::Min => "Min value",
            FeatureStatistic::Max => "Max value",
            FeatureStatistic::Mean => "Mean value",
            FeatureStatistic::Median => "Median (50 percentile) value",
            FeatureStatistic::Std => "Std value",
            FeatureStatistic::UniqueCount => "Number of unique values",
            FeatureStatistic::UniqueShare => "Share of unique values",
            FeatureStatistic::MostCommonValueShare => "Share of the most common value",
        }
    }

    fn extract(&self, stats: &FeatureStats) -> Option<f64> {
        match self {
            FeatureStatistic::Min => stats.min,
            FeatureStatistic::Max => stats.max,
            FeatureStatistic::Mean => stats.mean,
            FeatureStatistic::Median => stats.median,
            FeatureStatistic::Std => stats.std,
            FeatureStatistic::UniqueCount => stats.unique_count.map(|count| count as f64),
            FeatureStatistic::UniqueShare => stats.unique_share,
            FeatureStatistic::MostCommonValueShare => stats.most_common_value_share,
        }
    }
}

/// Checks one summary statistic of one column.
///
/// Only the most common value share has a default threshold: tolerant
/// equality (10%) around the reference share, or `lt=0.8` without reference
/// data. Every other statistic requires an explicit condition.
///
/// # Examples
///
/// ```rust
/// use stat_guard::condition::Condition;
/// use stat_guard::data_quality::FeatureValueTest;
/// use stat_guard::metrics::{
///     CachedMetric, DataQualityCalculation, DataQualityMetricsResult, DatasetStats, FeatureStats,
/// };
/// use std::sync::Arc;
///
/// let metric = Arc::new(CachedMetric::precomputed(
///     DataQualityCalculation,
///     DataQualityMetricsResult {
///         features_stats: DatasetStats::new()
///             .with_feature("age", FeatureStats { min: Some(18.0), ..Default::default() }),
///         ..Default::default()
///     },
/// ));
///
/// let test = FeatureValueTest::min("age")
///     .condition(Condition::new().greater_or_equal(18))
///     .metric(metric)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct FeatureValueTest {
    statistic: FeatureStatistic,
    column: String,
    threshold: Threshold,
    metric: MetricBinding<DataQualityCalculation>,
}

impl FeatureValueTest {
    pub fn builder(statistic: FeatureStatistic, column: impl Into<String>) -> FeatureValueTestBuilder {
        FeatureValueTestBuilder {
            statistic,
            column: column.into(),
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn min(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::Min, column)
    }

    pub fn max(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::Max, column)
    }

    pub fn mean(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::Mean, column)
    }

    pub fn median(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::Median, column)
    }

    pub fn std(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::Std, column)
    }

    pub fn unique_count(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::UniqueCount, column)
    }

    pub fn unique_share(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::UniqueShare, column)
    }

    pub fn most_common_value_share(column: impl Into<String>) -> FeatureValueTestBuilder {
        Self::builder(FeatureStatistic::MostCommonValueShare, column)
    }

    pub fn statistic(&self) -> FeatureStatistic {
        self.statistic
    }

    pub fn metric(&self) -> &DataQualityMetrics {
        self.metric.metric()
    }
}

impl Test for FeatureValueTest {
    fn name(&self) -> &str {
        self.statistic.test_name()
    }

    fn column_name(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn baseline(&self) -> std::result::Result<Baseline, CheckError> {
        if self.statistic != FeatureStatistic::MostCommonValueShare {
            return Ok(Baseline::Absent);
        }
        let result = self.metric.get_result()?;
        let Some(reference) = &result.reference_features_stats else {
            return Ok(Baseline::Absent);
        };
        let stats = reference.get(&self.column).ok_or_else(|| {
            CheckError::MissingReference(format!(
                "Feature '{}' was not found in reference data",
                self.column
            ))
        })?;
        self.statistic
            .extract(stats)
            .map(Baseline::Value)
            .ok_or_else(|| {
                CheckError::MissingReference(format!(
                    "No reference value for the feature '{}'",
                    self.column
                ))
            })
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        let stats = result
            .features_stats
            .get(&self.column)
            .ok_or_else(|| CheckError::feature_not_found(&self.column))?;
        self.statistic
            .extract(stats)
            .map(ScalarValue::Number)
            .ok_or_else(|| CheckError::no_value(format!("the feature '{}'", self.column)))
    }

    fn describe(&self, value: &ScalarValue, condition: &Condition) -> String {
        match self.statistic {
            FeatureStatistic::MostCommonValueShare => {
                let share = value.as_f64().map(format_number).unwrap_or_else(|| value.to_string());
                format!(
                    "Share of the Most Common Value for column '{}' is {share}. Test Threshold is [{condition}].",
                    self.column
                )
            }
            statistic => format!(
                "{} for feature '{}' is {value}",
                statistic.label(),
                self.column
            ),
        }
    }
}

/// Builder for [`FeatureValueTest`].
#[derive(Debug)]
pub struct FeatureValueTestBuilder {
    statistic: FeatureStatistic,
    column: String,
    condition: Option<Condition>,
    metric: Option<Arc<DataQualityMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl FeatureValueTestBuilder {
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Reads statistics from an existing, possibly shared, metric.
    pub fn metric(mut self, metric: Arc<CachedMetric<DataQualityCalculation>>) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Builds a private metric over `source`.
    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<FeatureValueTest> {
        let threshold = Threshold::resolve(self.condition, self.statistic.policy())?;
        let metric =
            MetricBinding::from_parts(self.metric, self.source, || Ok(DataQualityCalculation))?;
        Ok(FeatureValueTest {
            statistic: self.statistic,
            column: self.column,
            threshold,
            metric,
        })
    }
}
