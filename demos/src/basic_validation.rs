//! Basic example: build a few tests against a statistics source and run them.
//!
//! Run with `cargo run --example basic_validation`.

use stat_guard::condition::{approx, Condition};
use stat_guard::core::{Test, TestSuite};
use stat_guard::data_quality::{
    FeatureValueTest, MeanInNSigmasTest, RangeMeasure, StabilityTest, ValueRangeTest,
};
use stat_guard::logging::setup::{init_logging, LoggingConfig};
use stat_guard::metrics::StatisticsSource;
use stat_guard::test_fixtures::StaticStatisticsSource;
use std::error::Error;
use std::sync::Arc;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    init_logging(LoggingConfig::default())?;

    // Canned statistics stand in for a real pipeline here
    let source: Arc<dyn StatisticsSource> = Arc::new(StaticStatisticsSource::income_dataset());

    let mean_income = FeatureValueTest::mean("income")
        .condition(Condition::new().equal(approx(52.0).with_relative(0.1)))
        .source(source.clone())
        .build()?;

    // A single check, outside of a suite
    let result = mean_income.check();
    println!("{}: {} - {}", result.name(), result.status(), result.description());

    let suite = TestSuite::builder("income_model")
        .description("Checks on the income feature and model outputs")
        .test(mean_income)
        .test(
            FeatureValueTest::most_common_value_share("color")
                .source(source.clone())
                .build()?,
        )
        .test(StabilityTest::target().source(source.clone()).build()?)
        .test(StabilityTest::prediction().source(source.clone()).build()?)
        .test(
            ValueRangeTest::builder(RangeMeasure::ShareOutOfRange)
                .column("income")
                .left(0.0)
                .right(120.0)
                .condition(Condition::new().less_or_equal(0.05))
                .source(source.clone())
                .build()?,
        )
        .test(MeanInNSigmasTest::builder("income").source(source).build()?)
        .build();

    let report = suite.run();
    println!("{}", report.to_human()?);

    if report.is_success() {
        println!("All tests passed");
    } else {
        println!(
            "{} of {} tests did not pass",
            report.summary.fail + report.summary.error,
            report.summary.total
        );
    }
    Ok(())
}
