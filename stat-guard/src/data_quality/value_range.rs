//! Tests over values falling outside an interval.

use super::format_interval;
use crate::condition::{format_number, Condition, ScalarValue};
use crate::core::{
    ensure_matches, CheckError, ConditionMode, MetricBinding, Test, Threshold, ThresholdPolicy,
};
use crate::error::{GuardError, Result};
use crate::metrics::{StatisticsSource, ValueRangeCalculation, ValueRangeMetrics};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a [`ValueRangeTest`] measures about out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMeasure {
    /// Every value lies within the interval
    AllInRange,
    /// Number of values outside the interval
    NumberOutOfRange,
    /// Share of values outside the interval
    ShareOutOfRange,
}

impl RangeMeasure {
    pub fn test_name(&self) -> &'static str {
        match self {
            RangeMeasure::AllInRange => "Test all values of a column belong to the interval",
            RangeMeasure::NumberOutOfRange => "Test Number of Out-Of-Range Values",
            RangeMeasure::ShareOutOfRange => "Test Share of Out-Of-Range Values",
        }
    }
}

/// Checks values of a column against `[left, right]`; expects none outside by default.
#[derive(Debug)]
pub struct ValueRangeTest {
    measure: RangeMeasure,
    threshold: Threshold,
    metric: MetricBinding<ValueRangeCalculation>,
}

impl ValueRangeTest {
    pub fn builder(measure: RangeMeasure) -> ValueRangeTestBuilder {
        ValueRangeTestBuilder {
            measure,
            column: None,
            left: None,
            right: None,
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn measure(&self) -> RangeMeasure {
        self.measure
    }

    pub fn left(&self) -> Option<f64> {
        self.metric.calculation().left
    }

    pub fn right(&self) -> Option<f64> {
        self.metric.calculation().right
    }

    pub fn metric(&self) -> &ValueRangeMetrics {
        self.metric.metric()
    }

    fn column(&self) -> &str {
        &self.metric.calculation().column
    }

    fn interval(&self) -> String {
        format_interval(self.left(), self.right())
    }
}

impl Test for ValueRangeTest {
    fn name(&self) -> &str {
        self.measure.test_name()
    }

    fn column_name(&self) -> Option<&str> {
        Some(self.column())
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        Ok(match self.measure {
            RangeMeasure::AllInRange | RangeMeasure::NumberOutOfRange => {
                ScalarValue::from(result.number_not_in_range)
            }
            RangeMeasure::ShareOutOfRange => ScalarValue::from(result.share_not_in_range),
        })
    }

    fn describe(&self, value: &ScalarValue, condition: &Condition) -> String {
        let column = self.column();
        let nothing_outside = self.threshold.mode() == ConditionMode::Derived
            && value.as_f64() == Some(0.0);
        match self.measure {
            RangeMeasure::AllInRange | RangeMeasure::ShareOutOfRange if nothing_outside => {
                format!("All values of column '{column}' lie within {}", self.interval())
            }
            RangeMeasure::AllInRange => format!(
                "Column '{column}' has {value} values that are not in range {}",
                self.interval()
            ),
            RangeMeasure::NumberOutOfRange => {
                format!("Number of out-of-range values for feature '{column}' is {value}")
            }
            RangeMeasure::ShareOutOfRange => {
                let share = value.as_f64().map(format_number).unwrap_or_default();
                format!(
                    "Share of out-of-range values for feature '{column}' is {share}. Test Threshold is [{condition}]."
                )
            }
        }
    }
}

/// Builder for [`ValueRangeTest`].
///
/// With a statistics source, `column` is required. With an explicit metric,
/// omitted parameters are taken from the metric and given ones must match it.
#[derive(Debug)]
pub struct ValueRangeTestBuilder {
    measure: RangeMeasure,
    column: Option<String>,
    left: Option<f64>,
    right: Option<f64>,
    condition: Option<Condition>,
    metric: Option<Arc<ValueRangeMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl ValueRangeTestBuilder {
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn right(mut self, right: f64) -> Self {
        self.right = Some(right);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn metric(mut self, metric: Arc<ValueRangeMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<ValueRangeTest> {
        let threshold = Threshold::resolve(self.condition, ThresholdPolicy::ZeroTolerance)?;

        if let Some(metric) = &self.metric {
            let bound = metric.calculation();
            ensure_matches("column", self.column.as_deref(), bound.column.as_str())?;
            ensure_matches("left", self.left.map(Some).as_ref(), &bound.left)?;
            ensure_matches("right", self.right.map(Some).as_ref(), &bound.right)?;
        }
        if let (Some(left), Some(right)) = (self.left, self.right) {
            if left > right {
                return Err(GuardError::configuration(format!(
                    "interval left edge {left} is greater than right edge {right}"
                )));
            }
        }

        let (column, left, right) = (self.column, self.left, self.right);
        let metric = MetricBinding::from_parts(self.metric, self.source, || {
            let column = column.ok_or_else(|| {
                GuardError::configuration("a column is required to build a value range metric")
            })?;
            Ok(ValueRangeCalculation::new(column, left, right))
        })?;

        Ok(ValueRangeTest {
            measure: self.measure,
            threshold,
            metric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TestStatus;
    use crate::metrics::{CachedMetric, ValueRangeMetricsResult};

    fn metric(not_in_range: u64, share: f64) -> Arc<ValueRangeMetrics> {
        Arc::new(CachedMetric::precomputed(
            ValueRangeCalculation::new("age", Some(0.0), Some(100.0)),
            ValueRangeMetricsResult {
                column: "age".to_string(),
                left: Some(0.0),
                right: Some(100.0),
                number_in_range: 100 - not_in_range,
                number_not_in_range: not_in_range,
                share_in_range: 1.0 - share,
                share_not_in_range: share,
            },
        ))
    }

    #[test]
    fn test_share_all_within() {
        let test = ValueRangeTest::builder(RangeMeasure::ShareOutOfRange)
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Success);
        assert_eq!(
            result.description(),
            "All values of column 'age' lie within [0, 100]"
        );
        assert_eq!(test.column_name(), Some("age"));
    }

    #[test]
    fn test_explicit_condition_on_zero_share_keeps_numeric_wording() {
        let test = ValueRangeTest::builder(RangeMeasure::ShareOutOfRange)
            .condition(Condition::new().greater_than(0.01))
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert!(!result.description().contains("lie within"));
        assert!(result
            .description()
            .starts_with("Share of out-of-range values for feature 'age' is 0."));
        assert!(result.description().contains("gt=0.01"));
    }

    #[test]
    fn test_share_outside_fails_by_default() {
        let test = ValueRangeTest::builder(RangeMeasure::ShareOutOfRange)
            .column("age")
            .left(0.0)
            .right(100.0)
            .metric(metric(3, 0.03))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(
            result.description(),
            "Share of out-of-range values for feature 'age' is 0.03. Test Threshold is [eq=0 ± 1e-12]."
        );
    }

    #[test]
    fn test_share_with_explicit_allowance() {
        let test = ValueRangeTest::builder(RangeMeasure::ShareOutOfRange)
            .condition(Condition::new().less_or_equal(0.05))
            .metric(metric(3, 0.03))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Success);
    }

    #[test]
    fn test_all_in_range() {
        let test = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .metric(metric(2, 0.02))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(
            result.description(),
            "Column 'age' has 2 values that are not in range [0, 100]"
        );
    }

    #[test]
    fn test_number_out_of_range() {
        let test = ValueRangeTest::builder(RangeMeasure::NumberOutOfRange)
            .condition(Condition::new().less_than(5))
            .metric(metric(2, 0.02))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Success);
    }

    #[test]
    fn test_parameters_conflicting_with_metric() {
        let err = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .column("income")
            .metric(metric(0, 0.0))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let err = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .right(50.0)
            .metric(metric(0, 0.0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("right"));
    }

    #[test]
    fn test_adopts_metric_parameters() {
        let test = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        assert_eq!(test.left(), Some(0.0));
        assert_eq!(test.right(), Some(100.0));
    }

    #[derive(Debug)]
    struct NoStatistics;

    impl StatisticsSource for NoStatistics {}

    #[test]
    fn test_inverted_interval_rejected() {
        let err = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .column("age")
            .left(10.0)
            .right(1.0)
            .source(Arc::new(NoStatistics))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("greater than"));
    }

    #[test]
    fn test_source_route_requires_column() {
        let err = ValueRangeTest::builder(RangeMeasure::AllInRange)
            .right(1.0)
            .source(Arc::new(NoStatistics))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unsupported_source_is_error_result() {
        let test = ValueRangeTest::builder(RangeMeasure::NumberOutOfRange)
            .column("age")
            .source(Arc::new(NoStatistics))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert!(result.description().contains("value_range"));
    }
}
