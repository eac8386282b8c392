//! Tests over values missing from an allowed list.

use crate::condition::{format_number, Condition, ScalarValue};
use crate::core::{
    ensure_matches, CheckError, ConditionMode, MetricBinding, Test, Threshold, ThresholdPolicy,
};
use crate::error::{GuardError, Result};
use crate::metrics::{StatisticsSource, ValueListCalculation, ValueListMetrics};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a [`ValueListTest`] measures about out-of-list values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMeasure {
    /// Every value belongs to the list
    AllInList,
    /// Number of values not in the list
    NumberOutOfList,
    /// Share of values not in the list
    ShareOutOfList,
}

impl ListMeasure {
    pub fn test_name(&self) -> &'static str {
        match self {
            ListMeasure::AllInList => "Test all values of a column belong to the values list",
            ListMeasure::NumberOutOfList => "Test Number of Out-Of-List Values",
            ListMeasure::ShareOutOfList => "Test Share of Out-Of-List Values",
        }
    }
}

/// Checks values of a column against a list; expects none outside by default.
///
/// Without an explicit list the statistics source compares against the
/// values seen in reference data.
#[derive(Debug)]
pub struct ValueListTest {
    measure: ListMeasure,
    threshold: Threshold,
    metric: MetricBinding<ValueListCalculation>,
}

impl ValueListTest {
    pub fn builder(measure: ListMeasure) -> ValueListTestBuilder {
        ValueListTestBuilder {
            measure,
            column: None,
            values: None,
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn measure(&self) -> ListMeasure {
        self.measure
    }

    pub fn values(&self) -> Option<&[ScalarValue]> {
        self.metric.calculation().values.as_deref()
    }

    pub fn metric(&self) -> &ValueListMetrics {
        self.metric.metric()
    }

    fn column(&self) -> &str {
        &self.metric.calculation().column
    }
}

impl Test for ValueListTest {
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
            ListMeasure::AllInList | ListMeasure::NumberOutOfList => {
                ScalarValue::from(result.number_not_in_list)
            }
            ListMeasure::ShareOutOfList => ScalarValue::from(result.share_not_in_list),
        })
    }

    fn describe(&self, value: &ScalarValue, condition: &Condition) -> String {
        let column = self.column();
        let derived = self.threshold.mode() == ConditionMode::Derived;
        match self.measure {
            ListMeasure::AllInList if derived && value.as_f64() == Some(0.0) => {
                format!("All values of column '{column}' are in the values list")
            }
            ListMeasure::AllInList => {
                format!("Number of values of column '{column}' not in the values list is {value}")
            }
            ListMeasure::NumberOutOfList => {
                format!("Number of out-of-list values for feature '{column}' is {value}")
            }
            ListMeasure::ShareOutOfList => {
                let share = value.as_f64().map(format_number).unwrap_or_default();
                format!(
                    "Share of out-of-list values for feature '{column}' is {share}. Test Threshold is [{condition}]."
                )
            }
        }
    }
}

/// Builder for [`ValueListTest`].
#[derive(Debug)]
pub struct ValueListTestBuilder {
    measure: ListMeasure,
    column: Option<String>,
    values: Option<Vec<ScalarValue>>,
    condition: Option<Condition>,
    metric: Option<Arc<ValueListMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl ValueListTestBuilder {
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Sets the allowed values.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn metric(mut self, metric: Arc<ValueListMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<ValueListTest> {
        let threshold = Threshold::resolve(self.condition, ThresholdPolicy::ZeroTolerance)?;

        if let Some(metric) = &self.metric {
            let bound = metric.calculation();
            ensure_matches("column", self.column.as_deref(), bound.column.as_str())?;
            if let Some(values) = &self.values {
                let same = bound
                    .values
                    .as_deref()
                    .is_some_and(|bound| same_members(values, bound));
                if !same {
                    return Err(GuardError::configuration(format!(
                        "test parameter 'values' ({values:?}) conflicts with the metric's {:?}",
                        bound.values
                    )));
                }
            }
        }

        let (column, values) = (self.column, self.values);
        let metric = MetricBinding::from_parts(self.metric, self.source, || {
            let column = column.ok_or_else(|| {
                GuardError::configuration("a column is required to build a value list metric")
            })?;
            Ok(ValueListCalculation::new(column, values))
        })?;

        Ok(ValueListTest {
            measure: self.measure,
            threshold,
            metric,
        })
    }
}

/// Compares two value lists as sets.
fn same_members(left: &[ScalarValue], right: &[ScalarValue]) -> bool {
    left.iter().all(|value| right.contains(value)) && right.iter().all(|value| left.contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TestStatus;
    use crate::metrics::{CachedMetric, ValueListMetricsResult};

    fn metric(not_in_list: u64, share: f64) -> Arc<ValueListMetrics> {
        let values = vec![ScalarValue::from("red"), ScalarValue::from("green")];
        Arc::new(CachedMetric::precomputed(
            ValueListCalculation::new("color", Some(values.clone())),
            ValueListMetricsResult {
                column: "color".to_string(),
                values,
                number_in_list: 50 - not_in_list,
                number_not_in_list: not_in_list,
                share_in_list: 1.0 - share,
                share_not_in_list: share,
                ..Default::default()
            },
        ))
    }

    #[test]
    fn test_all_in_list() {
        let test = ValueListTest::builder(ListMeasure::AllInList)
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Success);
        assert_eq!(
            result.description(),
            "All values of column 'color' are in the values list"
        );
        assert_eq!(test.values().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_explicit_condition_on_zero_count_keeps_numeric_wording() {
        let test = ValueListTest::builder(ListMeasure::AllInList)
            .condition(Condition::new().greater_than(0))
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(
            result.description(),
            "Number of values of column 'color' not in the values list is 0"
        );
    }

    #[test]
    fn test_given_values_match_metric_in_any_order() {
        let test = ValueListTest::builder(ListMeasure::AllInList)
            .column("color")
            .values(["green", "red"])
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Success);
        assert_eq!(
            test.values(),
            Some(&[ScalarValue::from("red"), ScalarValue::from("green")][..])
        );
    }

    #[test]
    fn test_values_outside_list() {
        let test = ValueListTest::builder(ListMeasure::AllInList)
            .metric(metric(5, 0.1))
            .build()
            .unwrap();
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(
            result.description(),
            "Number of values of column 'color' not in the values list is 5"
        );
    }

    #[test]
    fn test_share_out_of_list() {
        let failing = ValueListTest::builder(ListMeasure::ShareOutOfList)
            .metric(metric(5, 0.1))
            .build()
            .unwrap();
        assert_eq!(failing.check().status(), TestStatus::Fail);

        let allowed = ValueListTest::builder(ListMeasure::ShareOutOfList)
            .condition(Condition::new().less_than(0.2))
            .metric(metric(5, 0.1))
            .build()
            .unwrap();
        let result = allowed.check();
        assert_eq!(result.status(), TestStatus::Success);
        assert!(result.description().contains("0.1"));
    }

    #[test]
    fn test_number_out_of_list() {
        let test = ValueListTest::builder(ListMeasure::NumberOutOfList)
            .metric(metric(0, 0.0))
            .build()
            .unwrap();
        assert_eq!(test.check().status(), TestStatus::Success);
    }

    #[test]
    fn test_values_conflicting_with_metric() {
        let err = ValueListTest::builder(ListMeasure::AllInList)
            .values(["red", "blue"])
            .metric(metric(0, 0.0))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let matching = ValueListTest::builder(ListMeasure::AllInList)
            .column("color")
            .values(["red", "green"])
            .metric(metric(0, 0.0))
            .build();
        assert!(matching.is_ok());
    }
}
