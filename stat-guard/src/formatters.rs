//! Result formatting for suite reports.
//!
//! A [`TestSuiteReport`] can be rendered as JSON for tooling, as colorized
//! text for a console, or as Markdown for CI summaries and documentation.
//!
//! # Examples
//!
//! ```rust
//! use stat_guard::core::{TestResult, TestSuiteReport};
//! use stat_guard::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//! use std::time::Duration;
//!
//! let result = TestResult::not_launched("Test Mean Value Stability", "data_quality")
//!     .mark_as_fail("Mean value of column income 61 is not in range from 40 to 60");
//! let report = TestSuiteReport::new("nightly", vec![result], Duration::from_millis(12));
//!
//! let formatter = HumanFormatter::with_config(FormatterConfig::ci());
//! let output = formatter.format(&report).unwrap();
//! assert!(output.contains("FAILED"));
//! ```

use crate::core::{TestResult, TestStatus, TestSuiteReport};
use crate::prelude::*;
use serde::Serialize;
use std::fmt::Write;

/// Configuration options for formatting suite reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the status counts
    pub include_summary: bool,
    /// Include individual test results
    pub include_results: bool,
    /// Include results whose status is SUCCESS
    pub include_successes: bool,
    /// Maximum number of results to display (-1 for all)
    pub max_results: i32,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_results: true,
            include_successes: true,
            max_results: -1,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_summary: true,
            include_results: false,
            include_successes: false,
            max_results: 0,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for CI/CD environments.
    ///
    /// Only tests that did not pass are listed.
    pub fn ci() -> Self {
        Self {
            include_summary: true,
            include_results: true,
            include_successes: false,
            max_results: 50,
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include the status counts.
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    /// Sets whether to include individual results.
    pub fn with_results(mut self, include: bool) -> Self {
        self.include_results = include;
        self
    }

    /// Sets whether passing tests are listed.
    pub fn with_successes(mut self, include: bool) -> Self {
        self.include_successes = include;
        self
    }

    /// Sets the maximum number of results to display.
    pub fn with_max_results(mut self, max: i32) -> Self {
        self.max_results = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Sets whether to include the report timestamp.
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Returns the results to list and how many were left out.
    fn select<'a>(&self, report: &'a TestSuiteReport) -> (Vec<&'a TestResult>, usize) {
        if !self.include_results {
            return (Vec::new(), 0);
        }
        let eligible: Vec<&TestResult> = report
            .results
            .iter()
            .filter(|result| self.include_successes || !result.is_success())
            .collect();
        let shown = if self.max_results < 0 {
            eligible.len()
        } else {
            eligible.len().min(self.max_results as usize)
        };
        let hidden = eligible.len() - shown;
        (eligible.into_iter().take(shown).collect(), hidden)
    }
}

/// Trait for formatting suite reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use stat_guard::core::TestSuiteReport;
/// use stat_guard::formatters::ResultFormatter;
///
/// struct OneLine;
///
/// impl ResultFormatter for OneLine {
///     fn format(&self, report: &TestSuiteReport) -> stat_guard::prelude::Result<String> {
///         Ok(format!("{}: {}/{}", report.suite_name, report.summary.success, report.summary.total))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats a report into a string representation.
    fn format(&self, report: &TestSuiteReport) -> Result<String>;

    /// Formats a report with custom configuration.
    ///
    /// The default implementation ignores the configuration.
    fn format_with_config(
        &self,
        report: &TestSuiteReport,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(report)
    }
}

/// Formats reports as structured JSON.
///
/// Compact by default; see [`JsonFormatter::with_pretty`].
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: false,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: false,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// The serialized shape of a filtered report.
#[derive(Serialize)]
struct JsonReport<'a> {
    suite_name: &'a str,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a crate::core::SuiteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<Vec<&'a TestResult>>,
    #[serde(skip_serializing_if = "is_zero")]
    omitted_results: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &TestSuiteReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &TestSuiteReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let (results, hidden) = config.select(report);
        let document = JsonReport {
            suite_name: &report.suite_name,
            success: report.is_success(),
            timestamp: config
                .include_timestamps
                .then_some(report.timestamp.as_str()),
            summary: config.include_summary.then_some(&report.summary),
            results: config.include_results.then_some(results),
            omitted_results: hidden,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        json.map_err(|e| GuardError::Internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Formats reports for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{color}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn status_color(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Success => "32",
        TestStatus::Fail => "31",
        TestStatus::Error => "35",
        TestStatus::Skipped => "33",
    }
}

fn status_symbol(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Success => "✅",
        TestStatus::Fail => "❌",
        TestStatus::Error => "🚨",
        TestStatus::Skipped => "⏭️",
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &TestSuiteReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &TestSuiteReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let colors = config.use_colors;

        writeln!(output)?;
        if report.is_success() {
            writeln!(output, "✅ {}", paint("Test suite PASSED", "32", colors))?;
        } else {
            writeln!(output, "❌ {}", paint("Test suite FAILED", "31", colors))?;
        }

        writeln!(output)?;
        writeln!(output, "Suite: {}", report.suite_name)?;
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", report.timestamp)?;
        }

        if config.include_summary {
            let summary = &report.summary;
            writeln!(output)?;
            writeln!(output, "📊 Summary:")?;
            writeln!(output, "   Total Tests: {}", summary.total)?;
            for (status, count) in [
                (TestStatus::Success, summary.success),
                (TestStatus::Fail, summary.fail),
                (TestStatus::Error, summary.error),
                (TestStatus::Skipped, summary.skipped),
            ] {
                writeln!(
                    output,
                    "   {} {}: {}",
                    status_symbol(status),
                    status,
                    paint(&count.to_string(), status_color(status), colors)
                )?;
            }
            writeln!(output, "   Success Rate: {:.1}%", summary.success_rate())?;
            writeln!(output, "   Execution Time: {}ms", summary.execution_time_ms)?;
        }

        let (results, hidden) = config.select(report);
        if !results.is_empty() {
            writeln!(output)?;
            writeln!(output, "🔍 Results:")?;
            for result in &results {
                writeln!(output)?;
                writeln!(
                    output,
                    "   {} [{}] {}",
                    status_symbol(result.status()),
                    paint(result.status().as_str(), status_color(result.status()), colors),
                    result.name()
                )?;
                writeln!(output, "      Group: {}", result.group())?;
                writeln!(output, "      {}", result.description())?;
            }
        }
        if hidden > 0 {
            writeln!(output)?;
            writeln!(output, "   ... and {hidden} more results")?;
        }

        writeln!(output)?;
        Ok(output)
    }
}

/// Formats reports as Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a new Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    /// Creates a new Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes characters that would break a table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, report: &TestSuiteReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &TestSuiteReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        if report.is_success() {
            writeln!(output, "{h} ✅ Test Suite Report - PASSED")?;
        } else {
            writeln!(output, "{h} ❌ Test Suite Report - FAILED")?;
        }

        writeln!(output)?;
        writeln!(output, "**Suite:** {}", report.suite_name)?;
        if config.include_timestamps {
            writeln!(output, "**Timestamp:** {}", report.timestamp)?;
        }

        if config.include_summary {
            let summary = &report.summary;
            writeln!(output)?;
            writeln!(output, "{h}# Summary")?;
            writeln!(output)?;
            writeln!(output, "| Metric | Value |")?;
            writeln!(output, "|--------|-------|")?;
            writeln!(output, "| Total Tests | {} |", summary.total)?;
            writeln!(output, "| Success | {} |", summary.success)?;
            writeln!(output, "| Fail | {} |", summary.fail)?;
            writeln!(output, "| Error | {} |", summary.error)?;
            writeln!(output, "| Skipped | {} |", summary.skipped)?;
            writeln!(output, "| Success Rate | {:.1}% |", summary.success_rate())?;
            writeln!(output, "| Execution Time | {}ms |", summary.execution_time_ms)?;
        }

        let (results, hidden) = config.select(report);
        if !results.is_empty() {
            writeln!(output)?;
            writeln!(output, "{h}# Results")?;
            writeln!(output)?;
            writeln!(output, "| Status | Test | Group | Description |")?;
            writeln!(output, "|--------|------|-------|-------------|")?;
            for result in &results {
                writeln!(
                    output,
                    "| {} {} | {} | {} | {} |",
                    status_symbol(result.status()),
                    result.status(),
                    table_cell(result.name()),
                    table_cell(result.group()),
                    table_cell(result.description())
                )?;
            }
        }
        if hidden > 0 {
            writeln!(output)?;
            writeln!(
                output,
                "> **Note:** {hidden} additional results not shown in this report."
            )?;
        }

        Ok(output)
    }
}
