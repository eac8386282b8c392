//! Example: load a declarative test plan from a file and run it.

use stat_guard::config::TestPlan;
use stat_guard::logging::setup::{init_logging, LoggingConfig};
use stat_guard::test_fixtures::StaticStatisticsSource;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tracing::Level;

const PLAN: &str = r#"{
    "name": "nightly_income_checks",
    "description": "Plan shipped alongside the nightly export",
    "tests": [
        {"test": "feature", "statistic": "mean", "column": "income", "condition": {"gt": 40, "lt": 70}},
        {"test": "feature", "statistic": "most_common_value_share", "column": "color"},
        {"test": "stability", "subject": "target"},
        {"test": "correlation", "kind": "target_prediction", "condition": {"gte": 0.5}},
        {"test": "value_range", "measure": "all_in_range", "column": "age", "left": 0, "right": 100},
        {"test": "value_quantile", "column": "income", "quantile": 0.95, "condition": {"lt": 120}},
        {"test": "mean_in_n_sigmas", "column": "income", "n_sigmas": 3}
    ]
}"#;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    init_logging(
        LoggingConfig::development()
            .with_level(Level::INFO)
            .with_json_format(true),
    )?;

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(PLAN.as_bytes())?;

    let plan = TestPlan::from_path(file.path())?;
    println!("Loaded plan '{}' with {} tests", plan.name, plan.tests.len());

    let source = Arc::new(StaticStatisticsSource::income_dataset());
    let suite = plan.build(source.clone())?;
    let report = suite.run();

    println!("{}", report.to_markdown()?);
    println!(
        "Statistics requested {} times for {} tests",
        source.calls(),
        report.summary.total
    );
    println!("Finished at {}", chrono::Utc::now().to_rfc3339());
    Ok(())
}
