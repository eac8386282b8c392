//! Test result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The status of a test evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    /// The value satisfied the condition
    Success,
    /// The value did not satisfy the condition
    Fail,
    /// The test could not be evaluated
    Error,
    /// The test has not been launched
    Skipped,
}

impl TestStatus {
    /// Returns true if this is a Success status.
    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Success)
    }

    /// Returns true if this is a Fail status.
    pub fn is_fail(&self) -> bool {
        matches!(self, TestStatus::Fail)
    }

    /// Returns true if this is an Error status.
    pub fn is_error(&self) -> bool {
        matches!(self, TestStatus::Error)
    }

    /// Returns true if this is a Skipped status.
    pub fn is_skipped(&self) -> bool {
        matches!(self, TestStatus::Skipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Success => "SUCCESS",
            TestStatus::Fail => "FAIL",
            TestStatus::Error => "ERROR",
            TestStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one test check.
///
/// A result starts as SKIPPED and is advanced to a terminal status exactly
/// once; the `mark_as_*` transitions consume the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    name: String,
    group: String,
    description: String,
    status: TestStatus,
}

impl TestResult {
    /// Creates a result for a test that has not been launched yet.
    pub fn not_launched(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            description: "The test was not launched".to_string(),
            status: TestStatus::Skipped,
        }
    }

    pub fn mark_as_success(self, description: impl Into<String>) -> Self {
        self.finish(TestStatus::Success, description)
    }

    pub fn mark_as_fail(self, description: impl Into<String>) -> Self {
        self.finish(TestStatus::Fail, description)
    }

    pub fn mark_as_error(self, description: impl Into<String>) -> Self {
        self.finish(TestStatus::Error, description)
    }

    fn finish(self, status: TestStatus, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Status counts collected while running a suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Total number of tests executed
    pub total: usize,
    /// Number of tests that passed
    pub success: usize,
    /// Number of tests that failed
    pub fail: usize,
    /// Number of tests that could not be evaluated
    pub error: usize,
    /// Number of tests that were skipped
    pub skipped: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
}

impl SuiteSummary {
    /// Counts the statuses of `results`.
    pub fn from_results(results: &[TestResult], elapsed: Duration) -> Self {
        let mut summary = Self {
            total: results.len(),
            execution_time_ms: elapsed.as_millis() as u64,
            ..Self::default()
        };
        for result in results {
            match result.status() {
                TestStatus::Success => summary.success += 1,
                TestStatus::Fail => summary.fail += 1,
                TestStatus::Error => summary.error += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Returns the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}

/// The aggregated results of running a [`TestSuite`](super::TestSuite).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuiteReport {
    /// Name of the suite
    pub suite_name: String,
    /// When the suite finished, RFC 3339
    pub timestamp: String,
    /// Status counts
    pub summary: SuiteSummary,
    /// One result per test, in suite order
    pub results: Vec<TestResult>,
}

impl TestSuiteReport {
    /// Creates a report stamped with the current time.
    pub fn new(suite_name: impl Into<String>, results: Vec<TestResult>, elapsed: Duration) -> Self {
        Self {
            suite_name: suite_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: SuiteSummary::from_results(&results, elapsed),
            results,
        }
    }

    /// Returns true if no test failed or errored.
    pub fn is_success(&self) -> bool {
        self.summary.fail == 0 && self.summary.error == 0
    }

    /// Returns the results with the given status.
    pub fn results_with_status(&self, status: TestStatus) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|result| result.status() == status)
            .collect()
    }

    /// Formats the report as compact JSON.
    pub fn to_json(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{JsonFormatter, ResultFormatter};
        JsonFormatter::new().format(self)
    }

    /// Formats the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{JsonFormatter, ResultFormatter};
        JsonFormatter::new().with_pretty(true).format(self)
    }

    /// Formats the report for console display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stat_guard::core::{TestResult, TestSuiteReport};
    /// use std::time::Duration;
    ///
    /// let result = TestResult::not_launched("Test number of conflicts in target", "data_quality")
    ///     .mark_as_success("Target is stable");
    /// let report = TestSuiteReport::new("nightly", vec![result], Duration::from_millis(3));
    /// let output = report.to_human().unwrap();
    /// assert!(output.contains("Target is stable"));
    /// ```
    pub fn to_human(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{HumanFormatter, ResultFormatter};
        HumanFormatter::new().format(self)
    }

    /// Formats the report as Markdown.
    pub fn to_markdown(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{MarkdownFormatter, ResultFormatter};
        MarkdownFormatter::new().format(self)
    }

    /// Formats the report using a custom formatter.
    pub fn format_with<F: crate::formatters::ResultFormatter>(
        &self,
        formatter: &F,
    ) -> crate::prelude::Result<String> {
        formatter.format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_starts_skipped() {
        let result = TestResult::not_launched("Test a feature min value", "data_quality");
        assert_eq!(result.status(), TestStatus::Skipped);
        assert_eq!(result.description(), "The test was not launched");
        assert_eq!(result.group(), "data_quality");
    }

    #[test]
    fn test_transitions() {
        let result = TestResult::not_launched("t", "data_quality").mark_as_fail("too high");
        assert_eq!(result.status(), TestStatus::Fail);
        assert_eq!(result.description(), "too high");
        assert_eq!(result.name(), "t");
    }

    #[test]
    fn test_status_serialization() {
        let result = TestResult::not_launched("t", "data_quality").mark_as_error("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert_eq!(json["description"], "boom");
        assert_eq!(
            serde_json::from_str::<TestStatus>("\"SKIPPED\"").unwrap(),
            TestStatus::Skipped
        );
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            TestResult::not_launched("a", "g").mark_as_success("ok"),
            TestResult::not_launched("b", "g").mark_as_fail("no"),
            TestResult::not_launched("c", "g").mark_as_error("err"),
            TestResult::not_launched("d", "g"),
        ];
        let summary = SuiteSummary::from_results(&results, Duration::from_millis(12));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.fail, 1);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.execution_time_ms, 12);
        assert_eq!(summary.success_rate(), 25.0);
    }

    #[test]
    fn test_report_success() {
        let passing = TestSuiteReport::new(
            "s",
            vec![TestResult::not_launched("a", "g").mark_as_success("ok")],
            Duration::ZERO,
        );
        assert!(passing.is_success());
        assert!(chrono::DateTime::parse_from_rfc3339(&passing.timestamp).is_ok());

        let failing = TestSuiteReport::new(
            "s",
            vec![TestResult::not_launched("a", "g").mark_as_error("err")],
            Duration::ZERO,
        );
        assert!(!failing.is_success());
        assert_eq!(failing.results_with_status(TestStatus::Error).len(), 1);
        assert!(SuiteSummary::default().success_rate() == 100.0);
    }
}
