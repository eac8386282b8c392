//! Example demonstrating the report formatters.
//!
//! This example shows how to format a suite report in different ways:
//! - JSON for programmatic consumption
//! - Human-readable text for the console
//! - Markdown for CI summaries
//! - Custom formatter configurations

use stat_guard::condition::Condition;
use stat_guard::core::TestSuite;
use stat_guard::data_quality::{
    CorrelationKind, CorrelationTest, FeatureValueTest, ListMeasure, StabilityTest, ValueListTest,
};
use stat_guard::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, ResultFormatter,
};
use stat_guard::metrics::StatisticsSource;
use stat_guard::test_fixtures::StaticStatisticsSource;
use std::error::Error;
use std::sync::Arc;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let source: Arc<dyn StatisticsSource> = Arc::new(StaticStatisticsSource::income_dataset());

    // A suite with a pass, a failure and an error
    let suite = TestSuite::builder("income_model")
        .description("Example suite with mixed outcomes")
        .test(StabilityTest::target().source(source.clone()).build()?)
        .test(StabilityTest::prediction().source(source.clone()).build()?)
        .test(
            FeatureValueTest::median("tenure")
                .condition(Condition::new().greater_than(0))
                .source(source.clone())
                .build()?,
        )
        .test(
            CorrelationTest::builder(CorrelationKind::TargetPrediction)
                .condition(Condition::new().greater_or_equal(0.8))
                .source(source.clone())
                .build()?,
        )
        .test(
            ValueListTest::builder(ListMeasure::ShareOutOfList)
                .column("color")
                .values(["red", "green", "blue"])
                .source(source)
                .build()?,
        )
        .build();

    println!("🔍 Running test suite...");
    let report = suite.run();

    println!("\n📄 JSON (pretty):");
    println!("{}", JsonFormatter::new().with_pretty(true).format(&report)?);

    println!("\n📄 JSON (compact):");
    println!("{}", report.to_json()?);

    println!("\n🖥️  Human-readable:");
    println!("{}", HumanFormatter::new().format(&report)?);

    println!("\n📝 Markdown:");
    println!(
        "{}",
        MarkdownFormatter::new().with_heading_level(3).format(&report)?
    );

    println!("\n⚙️  CI configuration (failures only, no colors):");
    let ci = HumanFormatter::with_config(FormatterConfig::ci());
    println!("{}", report.format_with(&ci)?);

    println!("\n⚙️  Minimal configuration:");
    let minimal = FormatterConfig::minimal();
    println!(
        "{}",
        MarkdownFormatter::new().format_with_config(&report, &minimal)?
    );

    Ok(())
}
