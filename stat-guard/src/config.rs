//! Declarative test plans.
//!
//! A [`TestPlan`] lists tests as JSON so a suite can be assembled without
//! writing Rust. Each entry is tagged by its family:
//!
//! ```json
//! {
//!   "name": "nightly",
//!   "tests": [
//!     {"test": "feature", "statistic": "most_common_value_share", "column": "color"},
//!     {"test": "value_range", "measure": "share_out_of_range", "column": "age",
//!      "left": 0, "right": 100, "condition": {"lte": 0.05}},
//!     {"test": "mean_in_n_sigmas", "column": "income", "n_sigmas": 3}
//!   ]
//! }
//! ```
//!
//! Building a plan checks every definition up front; the first invalid one
//! is reported as a configuration error naming its position in the plan.

use crate::condition::{Condition, ScalarValue};
use crate::core::{Test, TestSuite, DEFAULT_N_SIGMAS};
use crate::data_quality::{
    CorrelationKind, CorrelationTest, FeatureStatistic, FeatureValueTest, ListMeasure,
    MeanInNSigmasTest, RangeMeasure, StabilitySubject, StabilityTest, ValueListTest,
    ValueQuantileTest, ValueRangeTest,
};
use crate::metrics::{
    CachedMetric, CorrelationCalculation, CorrelationMethod, CorrelationMetrics,
    DataQualityCalculation, DataQualityMetrics, StabilityCalculation, StabilityMetrics,
    StatisticsSource,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

fn default_n_sigmas() -> f64 {
    DEFAULT_N_SIGMAS
}

/// One test in a [`TestPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestDefinition {
    Feature {
        statistic: FeatureStatistic,
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    Stability {
        subject: StabilitySubject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    Correlation {
        kind: CorrelationKind,
        #[serde(default)]
        method: CorrelationMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    ValueRange {
        measure: RangeMeasure,
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    ValueList {
        measure: ListMeasure,
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<Vec<ScalarValue>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    ValueQuantile {
        column: String,
        quantile: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    MeanInNSigmas {
        column: String,
        #[serde(default = "default_n_sigmas")]
        n_sigmas: f64,
        /// Always rejected; the window is derived from reference data.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
}

impl TestDefinition {
    /// Returns the family tag used in JSON.
    pub fn family(&self) -> &'static str {
        match self {
            TestDefinition::Feature { .. } => "feature",
            TestDefinition::Stability { .. } => "stability",
            TestDefinition::Correlation { .. } => "correlation",
            TestDefinition::ValueRange { .. } => "value_range",
            TestDefinition::ValueList { .. } => "value_list",
            TestDefinition::ValueQuantile { .. } => "value_quantile",
            TestDefinition::MeanInNSigmas { .. } => "mean_in_n_sigmas",
        }
    }

    fn build(&self, metrics: &mut PlanMetrics) -> Result<Arc<dyn Test>> {
        let test: Arc<dyn Test> = match self {
            TestDefinition::Feature {
                statistic,
                column,
                condition,
            } => {
                let mut builder =
                    FeatureValueTest::builder(*statistic, column).metric(metrics.data_quality());
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::Stability { subject, condition } => {
                let mut builder = StabilityTest::builder(*subject).metric(metrics.stability());
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::Correlation {
                kind,
                method,
                condition,
            } => {
                let mut builder = CorrelationTest::builder(*kind)
                    .method(*method)
                    .metric(metrics.correlations(*method));
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::ValueRange {
                measure,
                column,
                left,
                right,
                condition,
            } => {
                let mut builder = ValueRangeTest::builder(*measure)
                    .column(column)
                    .source(metrics.source());
                if let Some(left) = left {
                    builder = builder.left(*left);
                }
                if let Some(right) = right {
                    builder = builder.right(*right);
                }
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::ValueList {
                measure,
                column,
                values,
                condition,
            } => {
                let mut builder = ValueListTest::builder(*measure)
                    .column(column)
                    .source(metrics.source());
                if let Some(values) = values {
                    builder = builder.values(values.iter().cloned());
                }
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::ValueQuantile {
                column,
                quantile,
                condition,
            } => {
                let mut builder = ValueQuantileTest::builder()
                    .column(column)
                    .quantile(*quantile)
                    .source(metrics.source());
                if let Some(condition) = condition {
                    builder = builder.condition(condition.clone());
                }
                Arc::new(builder.build()?)
            }
            TestDefinition::MeanInNSigmas {
                column,
                n_sigmas,
                condition,
            } => {
                if condition.is_some() {
                    return Err(GuardError::configuration(
                        "mean_in_n_sigmas derives its condition from reference data and does not accept one",
                    ));
                }
                Arc::new(
                    MeanInNSigmasTest::builder(column)
                        .n_sigmas(*n_sigmas)
                        .metric(metrics.data_quality())
                        .build()?,
                )
            }
        };
        Ok(test)
    }
}

/// Parameterless metrics shared by every test a plan builds.
struct PlanMetrics {
    source: Arc<dyn StatisticsSource>,
    data_quality: Option<Arc<DataQualityMetrics>>,
    stability: Option<Arc<StabilityMetrics>>,
    correlations: BTreeMap<CorrelationMethod, Arc<CorrelationMetrics>>,
}

impl PlanMetrics {
    fn new(source: Arc<dyn StatisticsSource>) -> Self {
        Self {
            source,
            data_quality: None,
            stability: None,
            correlations: BTreeMap::new(),
        }
    }

    fn source(&self) -> Arc<dyn StatisticsSource> {
        Arc::clone(&self.source)
    }

    fn data_quality(&mut self) -> Arc<DataQualityMetrics> {
        let source = &self.source;
        Arc::clone(self.data_quality.get_or_insert_with(|| {
            Arc::new(CachedMetric::new(DataQualityCalculation, Arc::clone(source)))
        }))
    }

    fn stability(&mut self) -> Arc<StabilityMetrics> {
        let source = &self.source;
        Arc::clone(self.stability.get_or_insert_with(|| {
            Arc::new(CachedMetric::new(StabilityCalculation, Arc::clone(source)))
        }))
    }

    fn correlations(&mut self, method: CorrelationMethod) -> Arc<CorrelationMetrics> {
        let source = &self.source;
        Arc::clone(self.correlations.entry(method).or_insert_with(|| {
            Arc::new(CachedMetric::new(
                CorrelationCalculation::new(method),
                Arc::clone(source),
            ))
        }))
    }
}

/// A declarative list of tests that builds into a [`TestSuite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPlan {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tests: Vec<TestDefinition>,
}

impl TestPlan {
    /// Creates an empty plan.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tests: Vec::new(),
        }
    }

    /// Appends a test definition.
    pub fn with_test(mut self, definition: TestDefinition) -> Self {
        self.tests.push(definition);
        self
    }

    /// Parses a plan from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid test plan")
    }

    /// Reads and parses a plan from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read test plan {}", path.display()))?;
        let plan = Self::from_json(&json)?;
        debug!(
            plan.name = %plan.name,
            plan.tests = plan.tests.len(),
            path = %path.display(),
            "Loaded test plan"
        );
        Ok(plan)
    }

    /// Serializes the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds every test against `source`.
    ///
    /// Tests that only need the data quality, stability or correlation
    /// metrics share one cached instance per metric, so the source computes
    /// each of those at most once per suite. Parameterized metrics are owned
    /// by their test.
    pub fn build(&self, source: Arc<dyn StatisticsSource>) -> Result<TestSuite> {
        let mut metrics = PlanMetrics::new(source);
        let mut builder = TestSuite::builder(&self.name);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }

        for (index, definition) in self.tests.iter().enumerate() {
            let test = definition
                .build(&mut metrics)
                .with_context(|| format!("Test #{index} ({})", definition.family()))?;
            builder = builder.shared_test(test);
        }

        let suite = builder.build();
        info!(
            suite.name = %suite.name(),
            suite.tests = suite.len(),
            "Built test suite from plan"
        );
        Ok(suite)
    }
}
