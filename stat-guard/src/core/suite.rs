//! Test suite for organizing and running tests.

use super::result::{TestStatus, TestSuiteReport};
use super::test::Test;
use crate::logging::{truncate_field, LogConfig};
use crate::{log_metric, log_test, perf_debug};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// A collection of tests to be run together.
///
/// Tests are evaluated in insertion order; each produces exactly one result
/// and results do not depend on each other.
///
/// # Examples
///
/// ```rust
/// use stat_guard::core::TestSuite;
///
/// let suite = TestSuite::builder("nightly_data_quality")
///     .description("Checks run against every nightly export")
///     .build();
/// let report = suite.run();
/// assert!(report.is_success());
/// assert_eq!(report.summary.total, 0);
/// ```
#[derive(Debug, Clone)]
pub struct TestSuite {
    name: String,
    description: Option<String>,
    tests: Vec<Arc<dyn Test>>,
    log_config: LogConfig,
}

impl TestSuite {
    /// Creates a new builder for a test suite.
    pub fn builder(name: impl Into<String>) -> TestSuiteBuilder {
        TestSuiteBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tests(&self) -> &[Arc<dyn Test>] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Runs every test and aggregates the results.
    #[instrument(skip(self), fields(suite.name = %self.name, suite.tests = self.tests.len()))]
    pub fn run(&self) -> TestSuiteReport {
        info!(
            suite.name = %self.name,
            suite.tests = self.tests.len(),
            suite.description = ?self.description,
            "Starting test suite"
        );
        let start_time = Instant::now();

        let results: Vec<_> = self
            .tests
            .iter()
            .map(|test| {
                perf_debug!(self.log_config, test.name = %test.name(), "Checking test");
                let test_start = Instant::now();
                let result = test.check();
                let description =
                    truncate_field(result.description(), self.log_config.max_field_length);

                match result.status() {
                    TestStatus::Fail => warn!(
                        test.name = %result.name(),
                        test.description = %description,
                        "Test failed"
                    ),
                    TestStatus::Error => warn!(
                        test.name = %result.name(),
                        test.description = %description,
                        "Test could not be evaluated"
                    ),
                    _ => log_test!(
                        self.log_config,
                        test.name = %result.name(),
                        test.status = %result.status(),
                        test.description = %description,
                        elapsed_us = test_start.elapsed().as_micros() as u64,
                        "Test finished"
                    ),
                }
                result
            })
            .collect();

        let report = TestSuiteReport::new(&self.name, results, start_time.elapsed());

        log_metric!(
            self.log_config,
            suite.name = %self.name,
            execution_time_ms = report.summary.execution_time_ms,
            success_rate = report.summary.success_rate(),
            "Suite timings"
        );
        info!(
            suite.name = %self.name,
            summary.success = report.summary.success,
            summary.fail = report.summary.fail,
            summary.error = report.summary.error,
            summary.skipped = report.summary.skipped,
            "Test suite completed"
        );
        report
    }
}

/// Builder for constructing `TestSuite` instances.
#[derive(Debug)]
pub struct TestSuiteBuilder {
    name: String,
    description: Option<String>,
    tests: Vec<Arc<dyn Test>>,
    log_config: LogConfig,
}

impl TestSuiteBuilder {
    /// Creates a new test suite builder with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tests: Vec::new(),
            log_config: LogConfig::default(),
        }
    }

    /// Sets the description for the test suite.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a test to the suite.
    pub fn test<T: Test + 'static>(mut self, test: T) -> Self {
        self.tests.push(Arc::new(test));
        self
    }

    /// Adds an already shared test to the suite.
    pub fn shared_test(mut self, test: Arc<dyn Test>) -> Self {
        self.tests.push(test);
        self
    }

    /// Adds multiple shared tests to the suite.
    pub fn tests<I>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Test>>,
    {
        self.tests.extend(tests);
        self
    }

    /// Sets the logging configuration used while running.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Builds the test suite.
    pub fn build(self) -> TestSuite {
        TestSuite {
            name: self.name,
            description: self.description,
            tests: self.tests,
            log_config: self.log_config,
        }
    }
}
