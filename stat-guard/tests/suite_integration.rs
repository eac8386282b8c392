//! Suites of tests sharing metrics, their reports and concurrent checking.

mod common;

use common::loans;
use stat_guard::condition::Condition;
use stat_guard::core::{Test, TestStatus, TestSuite};
use stat_guard::data_quality::{
    CorrelationKind, CorrelationTest, FeatureValueTest, MeanInNSigmasTest, StabilityTest,
};
use stat_guard::formatters::{FormatterConfig, MarkdownFormatter, ResultFormatter};
use stat_guard::logging::LogConfig;
use stat_guard::metrics::{CachedMetric, DataQualityCalculation, StatisticsSource};
use std::sync::Arc;
use std::thread;

#[test]
fn test_shared_metric_is_computed_once() {
    let source = Arc::new(loans());
    let shared: Arc<dyn StatisticsSource> = source.clone();
    let metric = Arc::new(CachedMetric::new(DataQualityCalculation, shared));

    let suite = TestSuite::builder("income")
        .test(
            FeatureValueTest::mean("income")
                .condition(Condition::new().greater_than(0))
                .metric(metric.clone())
                .build()
                .unwrap(),
        )
        .test(
            FeatureValueTest::std("income")
                .condition(Condition::new().less_than(10))
                .metric(metric.clone())
                .build()
                .unwrap(),
        )
        .test(
            MeanInNSigmasTest::builder("income")
                .metric(metric.clone())
                .build()
                .unwrap(),
        )
        .build();

    let first = suite.run();
    let second = suite.run();
    assert_eq!(first.results, second.results);
    assert_eq!(source.calls(), 1);
    assert!(metric.is_computed());
}

#[test]
fn test_report_counts_match_results() {
    let source: Arc<dyn StatisticsSource> = Arc::new(loans());
    let suite = TestSuite::builder("loans")
        .description("Nightly loan model checks")
        .with_log_config(LogConfig::verbose())
        .test(StabilityTest::target().source(source.clone()).build().unwrap())
        .test(StabilityTest::prediction().source(source.clone()).build().unwrap())
        .test(
            FeatureValueTest::mean("tenure")
                .condition(Condition::new().greater_than(0))
                .source(source.clone())
                .build()
                .unwrap(),
        )
        .test(
            CorrelationTest::builder(CorrelationKind::TargetPrediction)
                .condition(Condition::new().greater_than(0.5))
                .source(source)
                .build()
                .unwrap(),
        )
        .build();

    let report = suite.run();
    assert_eq!(report.suite_name, "loans");
    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.success, 2);
    assert_eq!(report.summary.fail, 1);
    assert_eq!(report.summary.error, 1);
    assert_eq!(report.summary.skipped, 0);
    assert!(!report.is_success());
    assert_eq!(report.results_with_status(TestStatus::Error)[0].name(), "Test a feature mean value");
    assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
}

#[test]
fn test_report_formats() {
    let source: Arc<dyn StatisticsSource> = Arc::new(loans());
    let report = TestSuite::builder("loans")
        .test(StabilityTest::prediction().source(source).build().unwrap())
        .build()
        .run();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["summary"]["fail"], 1);
    assert_eq!(json["results"][0]["description"], "Not stable prediction rows count is 12");

    let markdown = MarkdownFormatter::with_config(FormatterConfig::ci())
        .format(&report)
        .unwrap();
    assert!(markdown.contains("Not stable prediction rows count is 12"));

    let human = report.to_human().unwrap();
    assert!(human.contains("Test suite FAILED"));
}

#[test]
fn test_tests_are_checked_from_many_threads() {
    let source: Arc<dyn StatisticsSource> = Arc::new(loans());
    let test: Arc<dyn Test> = Arc::new(
        MeanInNSigmasTest::builder("income")
            .n_sigmas(3.0)
            .source(source)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let test = Arc::clone(&test);
            thread::spawn(move || test.check())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().status(), TestStatus::Success);
    }
}
