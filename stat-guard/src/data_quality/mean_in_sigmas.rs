//! Mean stability against reference data.

use crate::condition::{format_number, Condition, ScalarValue};
use crate::core::{
    Baseline, CheckError, MetricBinding, Test, Threshold, ThresholdPolicy, DEFAULT_N_SIGMAS,
};
use crate::error::{GuardError, Result};
use crate::metrics::{DataQualityCalculation, DataQualityMetrics, StatisticsSource};
use std::sync::Arc;
use tracing::debug;

/// Checks that the current mean of a column lies strictly within
/// `n_sigmas` reference standard deviations of the reference mean.
///
/// The window is always derived from reference data; an explicit condition
/// cannot be given.
#[derive(Debug)]
pub struct MeanInNSigmasTest {
    column: String,
    n_sigmas: f64,
    threshold: Threshold,
    metric: MetricBinding<DataQualityCalculation>,
}

impl MeanInNSigmasTest {
    pub fn builder(column: impl Into<String>) -> MeanInNSigmasTestBuilder {
        MeanInNSigmasTestBuilder {
            column: column.into(),
            n_sigmas: DEFAULT_N_SIGMAS,
            metric: None,
            source: None,
        }
    }

    pub fn n_sigmas(&self) -> f64 {
        self.n_sigmas
    }

    pub fn metric(&self) -> &DataQualityMetrics {
        self.metric.metric()
    }
}

impl Test for MeanInNSigmasTest {
    fn name(&self) -> &str {
        "Test Mean Value Stability"
    }

    fn column_name(&self) -> Option<&str> {
        Some(&self.column)
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn baseline(&self) -> std::result::Result<Baseline, CheckError> {
        let result = self.metric.get_result()?;
        let reference = result.reference_features_stats.as_ref().ok_or_else(|| {
            CheckError::MissingReference("Reference data is required".to_string())
        })?;
        let stats = reference.get(&self.column).ok_or_else(|| {
            CheckError::MissingReference(format!(
                "Column {} should be in reference data",
                self.column
            ))
        })?;
        match (stats.mean, stats.std) {
            (Some(mean), Some(std)) => Ok(Baseline::Distribution { mean, std }),
            _ => Err(CheckError::MissingReference(format!(
                "No reference mean and std for column {}",
                self.column
            ))),
        }
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        let stats = result.features_stats.get(&self.column).ok_or_else(|| {
            CheckError::MissingInput(format!("Column {} should be in current data", self.column))
        })?;
        stats
            .mean
            .map(ScalarValue::Number)
            .ok_or_else(|| CheckError::no_value(format!("the mean of column {}", self.column)))
    }

    fn describe(&self, value: &ScalarValue, condition: &Condition) -> String {
        let inside = condition.check_value(value).unwrap_or(false);
        let edge = |edge: Option<f64>| edge.map(format_number).unwrap_or_default();
        format!(
            "Mean value of column {} {value} is {}in range from {} to {}",
            self.column,
            if inside { "" } else { "not " },
            edge(condition.lower_bound().map(|e| e.value)),
            edge(condition.upper_bound().map(|e| e.value)),
        )
    }
}

/// Builder for [`MeanInNSigmasTest`].
#[derive(Debug)]
pub struct MeanInNSigmasTestBuilder {
    column: String,
    n_sigmas: f64,
    metric: Option<Arc<DataQualityMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl MeanInNSigmasTestBuilder {
    /// Sets the window width in reference standard deviations; defaults to 2.
    pub fn n_sigmas(mut self, n_sigmas: f64) -> Self {
        self.n_sigmas = n_sigmas;
        self
    }

    pub fn metric(mut self, metric: Arc<DataQualityMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds the test.
    ///
    /// Forces the metric so that a result without reference statistics is
    /// rejected here. A metric that fails to compute is left for `check()`
    /// to report.
    pub fn build(self) -> Result<MeanInNSigmasTest> {
        if !self.n_sigmas.is_finite() || self.n_sigmas <= 0.0 {
            return Err(GuardError::configuration(format!(
                "n_sigmas must be a positive number, got {}",
                self.n_sigmas
            )));
        }
        let metric =
            MetricBinding::from_parts(self.metric, self.source, || Ok(DataQualityCalculation))?;

        match metric.get_result() {
            Ok(result) if result.reference_features_stats.is_none() => {
                return Err(GuardError::configuration(
                    "reference data is required for the mean stability test",
                ));
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Metric unavailable while building mean stability test"),
        }

        Ok(MeanInNSigmasTest {
            column: self.column,
            n_sigmas: self.n_sigmas,
            threshold: Threshold::Derived(ThresholdPolicy::SigmaWindow {
                n_sigmas: self.n_sigmas,
            }),
            metric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TestStatus;
    use crate::metrics::{
        CachedMetric, DataQualityMetricsResult, DatasetStats, FeatureStats, MetricError,
        MetricResult,
    };

    fn metric(current_mean: f64, reference: Option<DatasetStats>) -> Arc<DataQualityMetrics> {
        Arc::new(CachedMetric::precomputed(
            DataQualityCalculation,
            DataQualityMetricsResult {
                features_stats: DatasetStats::new()
                    .with_feature("income", FeatureStats::numeric(current_mean, 7.0)),
                reference_features_stats: reference,
                ..Default::default()
            },
        ))
    }

    fn reference() -> Option<DatasetStats> {
        Some(DatasetStats::new().with_feature("income", FeatureStats::numeric(50.0, 5.0)))
    }

    #[test]
    fn test_mean_outside_window() {
        let test = MeanInNSigmasTest::builder("income")
            .metric(metric(61.0, reference()))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(
            result.description(),
            "Mean value of column income 61 is not in range from 40 to 60"
        );
    }

    #[test]
    fn test_mean_inside_window() {
        let test = MeanInNSigmasTest::builder("income")
            .n_sigmas(2.0)
            .metric(metric(55.0, reference()))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Success);
        assert_eq!(
            result.description(),
            "Mean value of column income 55 is in range from 40 to 60"
        );
    }

    #[test]
    fn test_wider_window() {
        let test = MeanInNSigmasTest::builder("income")
            .n_sigmas(3.0)
            .metric(metric(61.0, reference()))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Success);
    }

    #[test]
    fn test_missing_reference_is_configuration_error() {
        let err = MeanInNSigmasTest::builder("income")
            .metric(metric(55.0, None))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_column_missing_in_reference() {
        let test = MeanInNSigmasTest::builder("income")
            .metric(metric(55.0, Some(DatasetStats::new())))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert_eq!(
            result.description(),
            "Column income should be in reference data"
        );
    }

    #[test]
    fn test_column_missing_in_current() {
        let test = MeanInNSigmasTest::builder("age")
            .metric(metric(55.0, reference()))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert_eq!(result.description(), "Column age should be in current data");
    }

    #[test]
    fn test_invalid_n_sigmas() {
        for n in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = MeanInNSigmasTest::builder("income")
                .n_sigmas(n)
                .metric(metric(55.0, reference()))
                .build()
                .unwrap_err();
            assert!(err.is_configuration());
        }
    }

    #[derive(Debug)]
    struct BrokenSource;

    impl StatisticsSource for BrokenSource {
        fn data_quality(&self) -> MetricResult<DataQualityMetricsResult> {
            Err(MetricError::computation("pipeline unavailable"))
        }
    }

    #[test]
    fn test_failing_metric_reported_by_check() {
        let test = MeanInNSigmasTest::builder("income")
            .source(Arc::new(BrokenSource))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert!(result.description().contains("pipeline unavailable"));
    }
}
