//! Canned statistics for tests and demos.
//!
//! [`StaticStatisticsSource`] answers every [`StatisticsSource`] request
//! from snapshots given up front and counts how often it was asked, which
//! makes compute-once behavior observable.

use crate::condition::ScalarValue;
use crate::metrics::{
    CorrelationMethod, CorrelationMetricsResult, DataQualityMetricsResult, DatasetStats,
    FeatureStats, MetricError, MetricResult, StabilityMetricsResult, StatisticsSource,
    ValueListCalculation, ValueListMetricsResult, ValueQuantileCalculation,
    ValueQuantileMetricsResult, ValueRangeCalculation, ValueRangeMetricsResult,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`StatisticsSource`] backed by fixed snapshots.
///
/// Kinds without a snapshot report [`MetricError::Unavailable`]; per-column
/// kinds report [`MetricError::ColumnNotFound`] for unknown columns.
#[derive(Debug, Default)]
pub struct StaticStatisticsSource {
    data_quality: Option<DataQualityMetricsResult>,
    stability: Option<StabilityMetricsResult>,
    correlations: BTreeMap<CorrelationMethod, CorrelationMetricsResult>,
    value_ranges: BTreeMap<String, ValueRangeMetricsResult>,
    value_lists: BTreeMap<String, ValueListMetricsResult>,
    quantiles: BTreeMap<String, ValueQuantileMetricsResult>,
    calls: AtomicUsize,
}

impl StaticStatisticsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_quality(mut self, result: DataQualityMetricsResult) -> Self {
        self.data_quality = Some(result);
        self
    }

    pub fn with_stability(mut self, result: StabilityMetricsResult) -> Self {
        self.stability = Some(result);
        self
    }

    pub fn with_correlations(mut self, result: CorrelationMetricsResult) -> Self {
        self.correlations.insert(result.method, result);
        self
    }

    /// Adds value range counts; the interval edges are taken from each request.
    pub fn with_value_range(mut self, result: ValueRangeMetricsResult) -> Self {
        self.value_ranges.insert(result.column.clone(), result);
        self
    }

    /// Adds value list counts; the list is taken from each request when given.
    pub fn with_value_list(mut self, result: ValueListMetricsResult) -> Self {
        self.value_lists.insert(result.column.clone(), result);
        self
    }

    pub fn with_quantile(mut self, result: ValueQuantileMetricsResult) -> Self {
        self.quantiles.insert(result.column.clone(), result);
        self
    }

    /// Returns how many snapshots have been requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// A model-monitoring dataset with `income`, `age` and `color` columns
    /// plus reference statistics, stable targets and Pearson correlations.
    pub fn income_dataset() -> Self {
        let current = DatasetStats::new()
            .with_feature(
                "income",
                FeatureStats {
                    count: Some(1000),
                    min: Some(20.0),
                    max: Some(140.0),
                    median: Some(54.0),
                    ..FeatureStats::numeric(55.0, 7.0)
                },
            )
            .with_feature(
                "age",
                FeatureStats {
                    count: Some(1000),
                    min: Some(18.0),
                    max: Some(90.0),
                    median: Some(40.0),
                    ..FeatureStats::numeric(41.0, 12.0)
                },
            )
            .with_feature("color", categorical(1000, "red", 0.46));
        let reference = DatasetStats::new()
            .with_feature("income", FeatureStats::numeric(50.0, 5.0))
            .with_feature("age", FeatureStats::numeric(40.0, 12.0))
            .with_feature("color", categorical(800, "red", 0.42));

        Self::new()
            .with_data_quality(DataQualityMetricsResult {
                features_stats: current,
                reference_features_stats: Some(reference),
                ..Default::default()
            })
            .with_stability(StabilityMetricsResult {
                number_not_stable_target: Some(0),
                number_not_stable_prediction: Some(3),
            })
            .with_correlations(CorrelationMetricsResult {
                method: CorrelationMethod::Pearson,
                target_prediction_correlation: Some(0.83),
                abs_max_num_features_correlation: Some(0.41),
                abs_max_target_features_correlation: Some(0.37),
                abs_max_prediction_features_correlation: Some(0.35),
            })
            .with_value_range(ValueRangeMetricsResult {
                column: "age".to_string(),
                number_in_range: 1000,
                share_in_range: 1.0,
                ..Default::default()
            })
            .with_value_range(ValueRangeMetricsResult {
                column: "income".to_string(),
                number_in_range: 970,
                number_not_in_range: 30,
                share_in_range: 0.97,
                share_not_in_range: 0.03,
                ..Default::default()
            })
            .with_value_list(ValueListMetricsResult {
                column: "color".to_string(),
                values: vec!["red".into(), "green".into(), "blue".into()],
                number_in_list: 1000,
                share_in_list: 1.0,
                ..Default::default()
            })
            .with_quantile(ValueQuantileMetricsResult {
                column: "income".to_string(),
                quantile: 0.95,
                value: Some(98.5),
                reference_value: Some(91.0),
            })
    }
}

fn categorical(count: u64, most_common: &str, share: f64) -> FeatureStats {
    FeatureStats {
        count: Some(count),
        unique_count: Some(3),
        unique_share: Some(3.0 / count as f64),
        most_common_value: Some(ScalarValue::from(most_common)),
        most_common_value_share: Some(share),
        ..FeatureStats::default()
    }
}

impl StatisticsSource for StaticStatisticsSource {
    fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
        self.record_call();
        self.data_quality
            .clone()
            .ok_or_else(|| MetricError::unavailable("data_quality", "no snapshot"))
    }

    fn stability(&self) -> MetricResult<StabilityMetricsResult> {
        self.record_call();
        self.stability
            .clone()
            .ok_or_else(|| MetricError::unavailable("stability", "no snapshot"))
    }

    fn correlations(&self, method: CorrelationMethod) -> MetricResult<CorrelationMetricsResult> {
        self.record_call();
        self.correlations.get(&method).cloned().ok_or_else(|| {
            MetricError::unavailable("correlations", format!("no {method} snapshot"))
        })
    }

    fn value_range(
        &self,
        calculation: &ValueRangeCalculation,
    ) -> MetricResult<ValueRangeMetricsResult> {
        self.record_call();
        let result = self
            .value_ranges
            .get(&calculation.column)
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))?;
        Ok(ValueRangeMetricsResult {
            left: calculation.left,
            right: calculation.right,
            ..result.clone()
        })
    }

    fn value_list(&self, calculation: &ValueListCalculation) -> MetricResult<ValueListMetricsResult> {
        self.record_call();
        let mut result = self
            .value_lists
            .get(&calculation.column)
            .cloned()
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))?;
        if let Some(values) = &calculation.values {
            result.values = values.clone();
        }
        Ok(result)
    }

    fn value_quantile(
        &self,
        calculation: &ValueQuantileCalculation,
    ) -> MetricResult<ValueQuantileMetricsResult> {
        self.record_call();
        if !(0.0..=1.0).contains(&calculation.quantile) {
            return Err(MetricError::invalid_config(format!(
                "quantile must be within [0, 1], got {}",
                calculation.quantile
            )));
        }
        let result = self
            .quantiles
            .get(&calculation.column)
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))?;
        if result.quantile != calculation.quantile {
            return Err(MetricError::unavailable(
                "value_quantile",
                format!("quantile {} was not computed", calculation.quantile),
            ));
        }
        Ok(result.clone())
    }
}
