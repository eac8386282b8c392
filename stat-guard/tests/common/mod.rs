//! Shared in-memory statistics source for integration tests.

#![allow(dead_code)]

use serde::Deserialize;
use stat_guard::metrics::{
    CorrelationMethod, CorrelationMetricsResult, DataQualityMetricsResult, MetricError,
    MetricResult, StabilityMetricsResult, StatisticsSource, ValueListCalculation,
    ValueListMetricsResult, ValueQuantileCalculation, ValueQuantileMetricsResult,
    ValueRangeCalculation, ValueRangeMetricsResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshots as an upstream pipeline would export them.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshots {
    #[serde(default)]
    pub data_quality: Option<DataQualityMetricsResult>,
    #[serde(default)]
    pub stability: Option<StabilityMetricsResult>,
    #[serde(default)]
    pub correlations: Vec<CorrelationMetricsResult>,
    #[serde(default)]
    pub value_ranges: Vec<ValueRangeMetricsResult>,
    #[serde(default)]
    pub value_lists: Vec<ValueListMetricsResult>,
    #[serde(default)]
    pub quantiles: Vec<ValueQuantileMetricsResult>,
}

/// Answers requests from [`Snapshots`] and counts every request.
#[derive(Debug, Default)]
pub struct MemorySource {
    snapshots: Snapshots,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            snapshots,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_json(json: &str) -> Self {
        Self::new(serde_json::from_str(json).expect("valid snapshot JSON"))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl StatisticsSource for MemorySource {
    fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
        self.hit();
        self.snapshots
            .data_quality
            .clone()
            .ok_or_else(|| MetricError::unavailable("data_quality", "not exported"))
    }

    fn stability(&self) -> MetricResult<StabilityMetricsResult> {
        self.hit();
        self.snapshots
            .stability
            .clone()
            .ok_or_else(|| MetricError::unavailable("stability", "not exported"))
    }

    fn correlations(&self, method: CorrelationMethod) -> MetricResult<CorrelationMetricsResult> {
        self.hit();
        self.snapshots
            .correlations
            .iter()
            .find(|c| c.method == method)
            .cloned()
            .ok_or_else(|| MetricError::unavailable("correlations", method.as_str()))
    }

    fn value_range(
        &self,
        calculation: &ValueRangeCalculation,
    ) -> MetricResult<ValueRangeMetricsResult> {
        self.hit();
        self.snapshots
            .value_ranges
            .iter()
            .find(|r| {
                r.column == calculation.column
                    && r.left == calculation.left
                    && r.right == calculation.right
            })
            .cloned()
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))
    }

    fn value_list(&self, calculation: &ValueListCalculation) -> MetricResult<ValueListMetricsResult> {
        self.hit();
        self.snapshots
            .value_lists
            .iter()
            .find(|l| l.column == calculation.column)
            .cloned()
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))
    }

    fn value_quantile(
        &self,
        calculation: &ValueQuantileCalculation,
    ) -> MetricResult<ValueQuantileMetricsResult> {
        self.hit();
        self.snapshots
            .quantiles
            .iter()
            .find(|q| q.column == calculation.column && q.quantile == calculation.quantile)
            .cloned()
            .ok_or_else(|| MetricError::column_not_found(&calculation.column))
    }
}

/// A loan-default model export with reference data.
pub const LOANS: &str = r#"{
    "data_quality": {
        "features_stats": {
            "income": {"count": 5000, "min": 12.0, "max": 410.0, "mean": 61.0, "median": 55.0, "std": 9.0},
            "age": {"count": 5000, "min": 18.0, "max": 99.0, "mean": 43.2, "median": 42.0, "std": 11.5},
            "grade": {"count": 5000, "unique_count": 7, "unique_share": 0.0014,
                      "most_common_value": "B", "most_common_value_share": 0.46}
        },
        "reference_features_stats": {
            "income": {"count": 4000, "mean": 50.0, "std": 5.0},
            "age": {"count": 4000, "mean": 42.8, "std": 11.0},
            "grade": {"count": 4000, "most_common_value": "B", "most_common_value_share": 0.42}
        }
    },
    "stability": {"number_not_stable_target": 0, "number_not_stable_prediction": 12},
    "correlations": [
        {"method": "pearson", "target_prediction_correlation": 0.71,
         "abs_max_num_features_correlation": 0.93},
        {"method": "spearman", "target_prediction_correlation": 0.68}
    ],
    "value_ranges": [
        {"column": "age", "left": 0.0, "right": 100.0, "number_in_range": 5000,
         "number_not_in_range": 0, "share_in_range": 1.0, "share_not_in_range": 0.0},
        {"column": "income", "left": 0.0, "right": 100.0, "number_in_range": 4850,
         "number_not_in_range": 150, "share_in_range": 0.97, "share_not_in_range": 0.03}
    ],
    "value_lists": [
        {"column": "grade", "values": ["A", "B", "C", "D", "E", "F", "G"],
         "number_in_list": 5000, "number_not_in_list": 0, "share_in_list": 1.0, "share_not_in_list": 0.0}
    ],
    "quantiles": [
        {"column": "income", "quantile": 0.95, "value": 140.0, "reference_value": 120.0}
    ]
}"#;

pub fn loans() -> MemorySource {
    MemorySource::from_json(LOANS)
}
