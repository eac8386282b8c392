//! Quantile test.

use crate::condition::{Condition, ScalarValue};
use crate::core::{ensure_matches, CheckError, MetricBinding, Test, Threshold, ThresholdPolicy};
use crate::error::{GuardError, Result};
use crate::metrics::{StatisticsSource, ValueQuantileCalculation, ValueQuantileMetrics};
use std::sync::Arc;

/// Checks a quantile of a column against an explicit condition.
#[derive(Debug)]
pub struct ValueQuantileTest {
    threshold: Threshold,
    metric: MetricBinding<ValueQuantileCalculation>,
}

impl ValueQuantileTest {
    pub fn builder() -> ValueQuantileTestBuilder {
        ValueQuantileTestBuilder {
            column: None,
            quantile: None,
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn quantile(&self) -> f64 {
        self.metric.calculation().quantile
    }

    pub fn metric(&self) -> &ValueQuantileMetrics {
        self.metric.metric()
    }
}

impl Test for ValueQuantileTest {
    fn name(&self) -> &str {
        "Test a quantile value of a column"
    }

    fn column_name(&self) -> Option<&str> {
        Some(&self.metric.calculation().column)
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        result.value.map(ScalarValue::Number).ok_or_else(|| {
            CheckError::no_value(format!(
                "quantile {} of column '{}'",
                self.quantile(),
                self.metric.calculation().column
            ))
        })
    }

    fn describe(&self, value: &ScalarValue, _condition: &Condition) -> String {
        format!(
            "Quantile {} for column '{}' is {value}",
            self.quantile(),
            self.metric.calculation().column
        )
    }
}

/// Builder for [`ValueQuantileTest`].
#[derive(Debug)]
pub struct ValueQuantileTestBuilder {
    column: Option<String>,
    quantile: Option<f64>,
    condition: Option<Condition>,
    metric: Option<Arc<ValueQuantileMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl ValueQuantileTestBuilder {
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Sets the quantile, in `[0, 1]`.
    pub fn quantile(mut self, quantile: f64) -> Self {
        self.quantile = Some(quantile);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn metric(mut self, metric: Arc<ValueQuantileMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<ValueQuantileTest> {
        let threshold = Threshold::resolve(self.condition, ThresholdPolicy::ExplicitOnly)?;

        if let Some(quantile) = self.quantile {
            if !(0.0..=1.0).contains(&quantile) {
                return Err(GuardError::configuration(format!(
                    "quantile must be within [0, 1], got {quantile}"
                )));
            }
        }
        if let Some(metric) = &self.metric {
            let bound = metric.calculation();
            ensure_matches("column", self.column.as_deref(), bound.column.as_str())?;
            ensure_matches("quantile", self.quantile.as_ref(), &bound.quantile)?;
        }

        let (column, quantile) = (self.column, self.quantile);
        let metric = MetricBinding::from_parts(self.metric, self.source, || {
            match (column, quantile) {
                (Some(column), Some(quantile)) => {
                    Ok(ValueQuantileCalculation::new(column, quantile))
                }
                _ => Err(GuardError::configuration(
                    "a column and a quantile are required to build a quantile metric",
                )),
            }
        })?;

        Ok(ValueQuantileTest { threshold, metric })
    }
}
