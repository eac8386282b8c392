//! Conflict tests: rows with identical features but different target or prediction.

use crate::condition::{Condition, ScalarValue};
use crate::core::{CheckError, ConditionMode, MetricBinding, Test, Threshold, ThresholdPolicy};
use crate::error::Result;
use crate::metrics::{StabilityCalculation, StabilityMetrics, StatisticsSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The column whose conflicts a [`StabilityTest`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilitySubject {
    Target,
    Prediction,
}

impl StabilitySubject {
    pub fn test_name(&self) -> &'static str {
        match self {
            StabilitySubject::Target => "Test number of conflicts in target",
            StabilitySubject::Prediction => "Test number of conflicts in prediction",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StabilitySubject::Target => "target",
            StabilitySubject::Prediction => "prediction",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            StabilitySubject::Target => "Target",
            StabilitySubject::Prediction => "Prediction",
        }
    }
}

/// Counts not-stable rows of the target or prediction; expects zero by default.
#[derive(Debug)]
pub struct StabilityTest {
    subject: StabilitySubject,
    threshold: Threshold,
    metric: MetricBinding<StabilityCalculation>,
}

impl StabilityTest {
    pub fn builder(subject: StabilitySubject) -> StabilityTestBuilder {
        StabilityTestBuilder {
            subject,
            condition: None,
            metric: None,
            source: None,
        }
    }

    pub fn target() -> StabilityTestBuilder {
        Self::builder(StabilitySubject::Target)
    }

    pub fn prediction() -> StabilityTestBuilder {
        Self::builder(StabilitySubject::Prediction)
    }

    pub fn subject(&self) -> StabilitySubject {
        self.subject
    }

    pub fn metric(&self) -> &StabilityMetrics {
        self.metric.metric()
    }
}

impl Test for StabilityTest {
    fn name(&self) -> &str {
        self.subject.test_name()
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn calculate_value(&self) -> std::result::Result<ScalarValue, CheckError> {
        let result = self.metric.get_result()?;
        let count = match self.subject {
            StabilitySubject::Target => result.number_not_stable_target,
            StabilitySubject::Prediction => result.number_not_stable_prediction,
        };
        count.map(ScalarValue::from).ok_or_else(|| {
            CheckError::MissingInput(format!("No {} in the dataset", self.subject.label()))
        })
    }

    fn describe(&self, value: &ScalarValue, _condition: &Condition) -> String {
        // "stable" only reads as a verdict under the zero-conflict default
        if self.threshold.mode() == ConditionMode::Derived && value.as_f64() == Some(0.0) {
            format!("{} is stable", self.subject.title())
        } else {
            format!("Not stable {} rows count is {value}", self.subject.label())
        }
    }
}

/// Builder for [`StabilityTest`].
#[derive(Debug)]
pub struct StabilityTestBuilder {
    subject: StabilitySubject,
    condition: Option<Condition>,
    metric: Option<Arc<StabilityMetrics>>,
    source: Option<Arc<dyn StatisticsSource>>,
}

impl StabilityTestBuilder {
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn metric(mut self, metric: Arc<StabilityMetrics>) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn source(mut self, source: Arc<dyn StatisticsSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<StabilityTest> {
        Ok(StabilityTest {
            subject: self.subject,
            threshold: Threshold::resolve(self.condition, ThresholdPolicy::ZeroTolerance)?,
            metric: MetricBinding::from_parts(self.metric, self.source, || {
                Ok(StabilityCalculation)
            })?,
        })
    }
}
