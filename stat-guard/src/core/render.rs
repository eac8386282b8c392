//! Read-only snapshots for renderers.

use super::test::Test;
use super::threshold::ConditionMode;
use crate::condition::{BandEdge, Condition, ScalarValue};
use serde::{Deserialize, Serialize};

/// Everything a renderer needs to draw a test: the scalar it checked and the
/// acceptance band around it.
///
/// Captured from cached metric results, so no statistic is recomputed.
/// Fields that cannot be resolved (missing column, absent reference) are
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub name: String,
    pub group: String,
    pub column: Option<String>,
    pub mode: ConditionMode,
    pub condition: Option<Condition>,
    pub value: Option<ScalarValue>,
    pub lower: Option<BandEdge>,
    pub upper: Option<BandEdge>,
}

impl RenderState {
    pub fn capture<T: Test + ?Sized>(test: &T) -> Self {
        let condition = test.condition().ok();
        Self {
            name: test.name().to_string(),
            group: test.group().to_string(),
            column: test.column_name().map(str::to_string),
            mode: test.threshold().mode(),
            lower: condition.as_ref().and_then(Condition::lower_bound),
            upper: condition.as_ref().and_then(Condition::upper_bound),
            value: test.calculate_value().ok(),
            condition,
        }
    }
}
