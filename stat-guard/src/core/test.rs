//! The test contract and its single evaluation algorithm.

use super::render::RenderState;
use super::result::TestResult;
use super::threshold::{Baseline, Threshold};
use crate::condition::{Condition, ConditionError, ScalarValue};
use crate::metrics::MetricError;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

/// Group label of every built-in test.
pub const DATA_QUALITY_GROUP: &str = "data_quality";

/// Errors captured into a [`TestResult`] with status ERROR.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The tested column is missing from the current statistics.
    #[error("Feature '{column}' was not found")]
    FeatureNotFound { column: String },

    /// A required input is missing from the metric result.
    #[error("{0}")]
    MissingInput(String),

    /// The statistic under test is undefined.
    #[error("No value for {subject}")]
    NoValue { subject: String },

    /// Reference statistics needed to derive the condition are missing.
    #[error("{0}")]
    MissingReference(String),

    /// The metric could not be obtained.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// The condition could not be applied to the value.
    #[error("Cannot evaluate the condition: {0}")]
    Condition(#[from] ConditionError),
}

impl CheckError {
    pub fn feature_not_found(column: impl Into<String>) -> Self {
        Self::FeatureNotFound {
            column: column.into(),
        }
    }

    pub fn no_value(subject: impl Into<String>) -> Self {
        Self::NoValue {
            subject: subject.into(),
        }
    }
}

/// A single assertion about a statistic.
///
/// Implementors provide the two variant-specific behaviours,
/// [`calculate_value`](Test::calculate_value) and
/// [`describe`](Test::describe), plus the accessors. [`check`](Test::check)
/// runs the shared algorithm in [`evaluate`] and never fails: every problem
/// after construction ends up in the result.
///
/// # Examples
///
/// ```rust
/// use stat_guard::condition::{Condition, ScalarValue};
/// use stat_guard::core::{CheckError, Test, TestStatus, Threshold};
///
/// #[derive(Debug)]
/// struct RowCount {
///     rows: u64,
///     threshold: Threshold,
/// }
///
/// impl Test for RowCount {
///     fn name(&self) -> &str {
///         "Test number of rows"
///     }
///
///     fn threshold(&self) -> &Threshold {
///         &self.threshold
///     }
///
///     fn calculate_value(&self) -> Result<ScalarValue, CheckError> {
///         Ok(ScalarValue::from(self.rows))
///     }
///
///     fn describe(&self, value: &ScalarValue, _condition: &Condition) -> String {
///         format!("Number of rows is {value}")
///     }
/// }
///
/// let test = RowCount {
///     rows: 120,
///     threshold: Threshold::Explicit(Condition::new().greater_or_equal(100)),
/// };
/// assert_eq!(test.check().status(), TestStatus::Success);
/// ```
pub trait Test: Send + Sync + Debug {
    /// Returns the name reported in results.
    fn name(&self) -> &str;

    /// Returns the group label reported in results.
    fn group(&self) -> &str {
        DATA_QUALITY_GROUP
    }

    /// Returns the column under test, if the test is column-scoped.
    fn column_name(&self) -> Option<&str> {
        None
    }

    /// Returns the threshold fixed at construction.
    fn threshold(&self) -> &Threshold;

    /// Returns the reference statistics the default policy derives from.
    fn baseline(&self) -> Result<Baseline, CheckError> {
        Ok(Baseline::Absent)
    }

    /// Validates preconditions and computes the value under test.
    fn calculate_value(&self) -> Result<ScalarValue, CheckError>;

    /// Builds the human-readable description of `value`.
    fn describe(&self, value: &ScalarValue, condition: &Condition) -> String;

    /// Returns the effective condition: explicit, or derived from the baseline.
    fn condition(&self) -> Result<Condition, CheckError> {
        match self.threshold() {
            Threshold::Explicit(condition) => Ok(condition.clone()),
            Threshold::Derived(policy) => policy.derive(&self.baseline()?),
        }
    }

    /// Evaluates the test.
    fn check(&self) -> TestResult {
        evaluate(self)
    }

    /// Captures what a renderer needs without running the check again.
    fn render_state(&self) -> RenderState {
        RenderState::capture(self)
    }
}

/// Runs the evaluation state machine for `test`.
///
/// The result starts as SKIPPED and leaves at the first unmet precondition:
/// value computation, then condition resolution, then the condition itself.
pub fn evaluate<T: Test + ?Sized>(test: &T) -> TestResult {
    let result = TestResult::not_launched(test.name(), test.group());

    let outcome = test.calculate_value().and_then(|value| {
        let condition = test.condition()?;
        let description = test.describe(&value, &condition);
        let passed = condition.check_value(&value)?;
        Ok((passed, description))
    });

    let result = match outcome {
        Ok((true, description)) => result.mark_as_success(description),
        Ok((false, description)) => result.mark_as_fail(description),
        Err(error) => result.mark_as_error(error.to_string()),
    };

    debug!(
        test.name = %result.name(),
        test.column = ?test.column_name(),
        test.status = %result.status(),
        "Test evaluated"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::approx;
    use crate::core::{TestStatus, ThresholdPolicy};

    #[derive(Debug)]
    struct FixedValue {
        value: Result<ScalarValue, CheckError>,
        threshold: Threshold,
        baseline: Baseline,
    }

    impl FixedValue {
        fn new(value: f64, threshold: Threshold) -> Self {
            Self {
                value: Ok(ScalarValue::from(value)),
                threshold,
                baseline: Baseline::Absent,
            }
        }
    }

    impl Test for FixedValue {
        fn name(&self) -> &str {
            "fixed value"
        }

        fn threshold(&self) -> &Threshold {
            &self.threshold
        }

        fn baseline(&self) -> Result<Baseline, CheckError> {
            Ok(self.baseline)
        }

        fn calculate_value(&self) -> Result<ScalarValue, CheckError> {
            self.value.clone()
        }

        fn describe(&self, value: &ScalarValue, condition: &Condition) -> String {
            format!("value is {value}, threshold is [{condition}]")
        }
    }

    #[test]
    fn test_success_and_fail() {
        let threshold = Threshold::Explicit(Condition::new().less_than(10));
        let result = FixedValue::new(3.0, threshold.clone()).check();
        assert_eq!(result.status(), TestStatus::Success);
        assert_eq!(result.description(), "value is 3, threshold is [lt=10]");
        assert_eq!(result.group(), DATA_QUALITY_GROUP);

        let result = FixedValue::new(12.0, threshold).check();
        assert_eq!(result.status(), TestStatus::Fail);
    }

    #[test]
    fn test_missing_value_is_error() {
        let test = FixedValue {
            value: Err(CheckError::feature_not_found("age")),
            threshold: Threshold::Derived(ThresholdPolicy::ZeroTolerance),
            baseline: Baseline::Absent,
        };
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert_eq!(result.description(), "Feature 'age' was not found");
    }

    #[test]
    fn test_condition_error_is_error() {
        let test = FixedValue {
            value: Ok(ScalarValue::from("text")),
            threshold: Threshold::Explicit(Condition::new().greater_than(1)),
            baseline: Baseline::Absent,
        };
        let result = test.check();
        assert_eq!(result.status(), TestStatus::Error);
        assert!(result
            .description()
            .starts_with("Cannot evaluate the condition"));
    }

    #[test]
    fn test_derivation_failure_is_error() {
        let test = FixedValue::new(
            50.0,
            Threshold::Derived(ThresholdPolicy::SigmaWindow { n_sigmas: 2.0 }),
        );
        assert_eq!(test.check().status(), TestStatus::Error);
    }

    #[test]
    fn test_derived_condition() {
        let mut test = FixedValue::new(0.46, Threshold::Derived(ThresholdPolicy::reference_relative()));
        test.baseline = Baseline::Value(0.42);
        assert_eq!(
            test.condition().unwrap(),
            Condition::new().equal(approx(0.42).with_relative(0.1))
        );
        assert_eq!(test.check().status(), TestStatus::Success);
    }

    #[test]
    fn test_fixed_ceiling_ignores_reference() {
        let mut below = FixedValue::new(
            0.3,
            Threshold::Derived(ThresholdPolicy::FixedCeiling { ceiling: 0.5 }),
        );
        below.baseline = Baseline::Value(0.1);
        assert_eq!(below.condition().unwrap(), Condition::new().less_than(0.5));
        assert_eq!(below.check().status(), TestStatus::Success);

        let above = FixedValue::new(
            0.5,
            Threshold::Derived(ThresholdPolicy::FixedCeiling { ceiling: 0.5 }),
        );
        let result = above.check();
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(result.description(), "value is 0.5, threshold is [lt=0.5]");
    }

    #[test]
    fn test_check_is_idempotent() {
        let test = FixedValue::new(0.0, Threshold::Derived(ThresholdPolicy::ZeroTolerance));
        assert_eq!(test.check(), test.check());
    }

    #[test]
    fn test_evaluate_through_trait_object() {
        let test: Box<dyn Test> = Box::new(FixedValue::new(
            1.0,
            Threshold::Explicit(Condition::new().is_in([1.0, 2.0])),
        ));
        assert!(evaluate(test.as_ref()).is_success());
    }
}
