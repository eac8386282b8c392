//! Correlation tests.

use crate::condition::{Condition, ScalarValue};
use crate::core::{ensure_matches, CheckError, MetricBinding, Test, Threshold, ThresholdPolicy};
use crate::error::Result;
use crate::metrics::{
    CorrelationCalculation, CorrelationMethod, CorrelationMetrics, CorrelationMetricsResult,
    StatisticsSource,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The correlation figure a [`CorrelationTest`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationKind {
    /// Correlation between target and prediction
    TargetPrediction,
    /// Largest absolute correlation between two numeric features
    FeatureMax,
    /// Largest absolute correlation between the target and a numeric feature
    TargetFeatures,
    /// Largest absolute correlation between the prediction and a numeric feature
    PredictionFeatures,
}

impl CorrelationKind {
    pub fn test_name(&self) -> &'static str {
        match self {
            CorrelationKind::TargetPrediction => "Test correlation between target and prediction",
            CorrelationKind::FeatureMax => "Test max correlation between numerical features",
            CorrelationKind::TargetFeatures => {
                "Test max correlation between target and numerical features"
            }
            CorrelationKind::PredictionFeatures => {
                "Test max correlation between prediction and numerical features"
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CorrelationKind::TargetPrediction => "Correlation between target and prediction",
            CorrelationKind::FeatureMax => "Max numeric features correlation",
            CorrelationKind::TargetFeatures => "Max correlation between target and numeric features",
            CorrelationKind::PredictionFeatures => {
                "Max correlation between prediction and numeric features"
            }
        }
    }

    fn extract(&self, result: &CorrelationMetricsResult) -> Option<f64> {
        match self {
            CorrelationKind::TargetPrediction => result.target_prediction_correlation,
            CorrelationKind::FeatureMax => result.abs_max_num_features_correlation,
            CorrelationKind::TargetFeatures => result.abs_max_target_features_correlation,
            CorrelationKind::PredictionFeatures => result.abs_max_prediction_features_correlation,
        }
    }
}

/// Checks one correlation figure; always requires an explicit condition.
#[derive(Debug)]
pub struct CorrelationTest {
    kind: CorrelationKind,
    threshold: Threshold,
    metric: MetricBinding<CorrelationCalculation>,
}

impl CorrelationTest {
    pub fn builder(kind: CorrelationKind) -> CorrelationTestBuilder {
        CorrelationTestBuilder {
            kind,
            method: None,
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn kind(&self) -> CorrelationKind {
        self.kind
    }

    /// Returns the correlation method of the bound metric.
    pub fn method(&self) -> CorrelationMethod {
        self.metric.calculation().method
    }

    pub fn metric(&self) -> &CorrelationMetrics {
        self.metric.metric()
    }
}

impl Test for CorrelationTest {
    fn name(&self) -> &str {
        self.kind.test_name()
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        self.kind
            .extract(result)
            .map(ScalarValue::Number)
            .ok_or_else(|| {
                CheckError::no_value(format!(
                    "the {} correlation figure",
                    self.method()
                ))
            })
    }

    fn describe(&self, value: &ScalarValue, _condition: &Condition) -> String {
        format!("{} ({}) is {value}", self.kind.label(), self.method())
    }
}

/// Builder for [`CorrelationTest`].
#[derive(Debug)]
pub struct CorrelationTestBuilder {
    kind: CorrelationKind,
    method: Option<CorrelationMethod>,
    condition: Option<Condition>,
    metric: Option<Arc<CorrelationMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl CorrelationTestBuilder {
    /// Sets the correlation method; defaults to Pearson.
    pub fn method(mut self, method: CorrelationMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn metric(mut self, metric: Arc<CorrelationMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<CorrelationTest> {
        let threshold = Threshold::resolve(self.condition, ThresholdPolicy::ExplicitOnly)?;
        if let Some(metric) = &self.metric {
            ensure_matches("method", self.method.as_ref(), &metric.calculation().method)?;
        }
        let method = self.method.unwrap_or_default();
        let metric = MetricBinding::from_parts(self.metric, self.source, || {
            Ok(CorrelationCalculation::new(method))
        })?;
        Ok(CorrelationTest {
            kind: self.kind,
            threshold,
            metric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TestStatus;
    use crate::metrics::CachedMetric;

    fn metric(method: CorrelationMethod) -> Arc<CorrelationMetrics> {
        Arc::new(CachedMetric::precomputed(
            CorrelationCalculation::new(method),
            CorrelationMetricsResult {
                method,
                target_prediction_correlation: Some(0.91),
                abs_max_num_features_correlation: Some(0.97),
                abs_max_target_features_correlation: None,
                abs_max_prediction_features_correlation: Some(0.4),
            },
        ))
    }

    #[test]
    fn test_target_prediction() {
        let test = CorrelationTest::builder(CorrelationKind::TargetPrediction)
            .condition(Condition::new().greater_than(0.8))
            .metric(metric(CorrelationMethod::Pearson))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Success);
        assert_eq!(
            result.description(),
            "Correlation between target and prediction (pearson) is 0.91"
        );
    }

    #[test]
    fn test_highly_correlated_features() {
        let test = CorrelationTest::builder(CorrelationKind::FeatureMax)
            .condition(Condition::new().less_than(0.9))
            .metric(metric(CorrelationMethod::Spearman))
            .build()
            .unwrap();
        assert_eq!(test.method(), CorrelationMethod::Spearman);
        assert_eq!(test.check().status(), TestStatus::Fail);
    }

    #[test]
    fn test_missing_figure_is_error() {
        let test = CorrelationTest::builder(CorrelationKind::TargetFeatures)
            .condition(Condition::new().less_than(0.9))
            .metric(metric(CorrelationMethod::Pearson))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Error);
    }

    #[test]
    fn test_method_conflict() {
        let err = CorrelationTest::builder(CorrelationKind::FeatureMax)
            .method(CorrelationMethod::Kendall)
            .condition(Condition::new().less_than(0.9))
            .metric(metric(CorrelationMethod::Pearson))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("method"));
    }

    #[test]
    fn test_condition_required() {
        let err = CorrelationTest::builder(CorrelationKind::FeatureMax)
            .metric(metric(CorrelationMethod::Pearson))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
