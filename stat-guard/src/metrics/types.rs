//! Immutable statistic snapshots produced by a [`StatisticsSource`](super::StatisticsSource).
//!
//! Every field is public so an external pipeline can fill the snapshot in
//! directly; statistics a pipeline cannot compute are left as `None`.

use crate::condition::ScalarValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-column summary statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub count: Option<u64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub unique_count: Option<u64>,
    pub unique_share: Option<f64>,
    pub most_common_value: Option<ScalarValue>,
    pub most_common_value_share: Option<f64>,
}

impl FeatureStats {
    /// Creates statistics for a numeric column with the given mean and std.
    pub fn numeric(mean: f64, std: f64) -> Self {
        Self {
            mean: Some(mean),
            std: Some(std),
            ..Self::default()
        }
    }
}

/// Statistics for every column of one dataset, ordered by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetStats {
    columns: BTreeMap<String, FeatureStats>,
}

impl DatasetStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the statistics of a column.
    pub fn with_feature(mut self, column: impl Into<String>, stats: FeatureStats) -> Self {
        self.columns.insert(column.into(), stats);
        self
    }

    pub fn get(&self, column: &str) -> Option<&FeatureStats> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Value frequencies of one column, for current and optionally reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueCounts {
    pub current: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<BTreeMap<String, u64>>,
}

/// Result of the data quality metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualityMetricsResult {
    pub features_stats: DatasetStats,
    #[serde(default)]
    pub reference_features_stats: Option<DatasetStats>,
    #[serde(default)]
    pub counts_of_values: BTreeMap<String, ValueCounts>,
}

/// Result of the stability metric.
///
/// A `None` count means the column is absent from the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetricsResult {
    pub number_not_stable_target: Option<u64>,
    pub number_not_stable_prediction: Option<u64>,
}

/// Correlation method used by the correlation metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
            CorrelationMethod::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the correlation metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMetricsResult {
    pub method: CorrelationMethod,
    pub target_prediction_correlation: Option<f64>,
    pub abs_max_num_features_correlation: Option<f64>,
    pub abs_max_target_features_correlation: Option<f64>,
    pub abs_max_prediction_features_correlation: Option<f64>,
}

/// Result of the value range metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeMetricsResult {
    pub column: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub number_in_range: u64,
    pub number_not_in_range: u64,
    pub share_in_range: f64,
    pub share_not_in_range: f64,
}

/// Result of the value list metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueListMetricsResult {
    pub column: String,
    pub values: Vec<ScalarValue>,
    pub number_in_list: u64,
    pub number_not_in_list: u64,
    pub share_in_list: f64,
    pub share_not_in_list: f64,
    #[serde(default)]
    pub counts_of_value: ValueCounts,
}

/// Result of the value quantile metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueQuantileMetricsResult {
    pub column: String,
    pub quantile: f64,
    pub value: Option<f64>,
    #[serde(default)]
    pub reference_value: Option<f64>,
}
