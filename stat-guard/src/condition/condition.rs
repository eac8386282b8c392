//! Threshold conditions over a single computed value.

use super::approx::ApproxValue;
use super::value::{format_number, ScalarValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a condition cannot be applied to a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    /// The predicate needs a number but the value is of another type.
    #[error("'{predicate}' cannot be applied to {value_type} value '{value}'")]
    IncompatibleValue {
        predicate: &'static str,
        value: String,
        value_type: &'static str,
    },

    /// An ordering predicate was given a tolerance band as its bound.
    #[error("'{predicate}' cannot be ordered against the tolerance band {bound}")]
    ToleranceOrdering {
        predicate: &'static str,
        bound: String,
    },
}

/// The operand of a numeric predicate: an exact number or a tolerant value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericBound {
    /// Compared exactly
    Exact(f64),
    /// Compared by band membership
    Approx(ApproxValue),
}

impl NumericBound {
    fn matches(&self, predicate: &'static str, value: &ScalarValue) -> Result<bool, ConditionError> {
        match (self, value) {
            (NumericBound::Exact(bound), ScalarValue::Number(v)) => Ok(v == bound),
            (NumericBound::Exact(_), _) => Ok(false),
            (NumericBound::Approx(bound), ScalarValue::Number(v)) => Ok(bound.contains(*v)),
            (NumericBound::Approx(_), other) => Err(incompatible(predicate, other)),
        }
    }

    fn ordered(
        &self,
        predicate: &'static str,
        value: &ScalarValue,
    ) -> Result<(f64, f64), ConditionError> {
        let bound = match self {
            NumericBound::Exact(bound) => *bound,
            NumericBound::Approx(approx) => {
                return Err(ConditionError::ToleranceOrdering {
                    predicate,
                    bound: approx.to_string(),
                })
            }
        };
        match value {
            ScalarValue::Number(v) => Ok((*v, bound)),
            other => Err(incompatible(predicate, other)),
        }
    }
}

impl From<f64> for NumericBound {
    fn from(value: f64) -> Self {
        NumericBound::Exact(value)
    }
}

impl From<i32> for NumericBound {
    fn from(value: i32) -> Self {
        NumericBound::Exact(f64::from(value))
    }
}

impl From<ApproxValue> for NumericBound {
    fn from(value: ApproxValue) -> Self {
        NumericBound::Approx(value)
    }
}

impl fmt::Display for NumericBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBound::Exact(v) => write!(f, "{}", format_number(*v)),
            NumericBound::Approx(approx) => write!(f, "{approx}"),
        }
    }
}

fn incompatible(predicate: &'static str, value: &ScalarValue) -> ConditionError {
    ConditionError::IncompatibleValue {
        predicate,
        value: value.to_string(),
        value_type: value.type_name(),
    }
}

/// One edge of a condition's acceptance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandEdge {
    pub value: f64,
    pub inclusive: bool,
}

impl BandEdge {
    fn tighter_lower(self, other: BandEdge) -> BandEdge {
        if other.value > self.value || (other.value == self.value && !other.inclusive) {
            other
        } else {
            self
        }
    }

    fn tighter_upper(self, other: BandEdge) -> BandEdge {
        if other.value < self.value || (other.value == self.value && !other.inclusive) {
            other
        } else {
            self
        }
    }
}

/// An immutable set of threshold predicates.
///
/// A value passes when every configured predicate holds. A condition with no
/// predicate set is "unset" and is never evaluated by a built test.
///
/// # Examples
///
/// ```rust
/// use stat_guard::condition::{approx, Condition, ScalarValue};
///
/// let window = Condition::new().greater_than(40.0).less_than(60.0);
/// assert!(window.check_value(&ScalarValue::from(50.0)).unwrap());
/// assert!(!window.check_value(&ScalarValue::from(60.0)).unwrap());
///
/// let near = Condition::new().equal(approx(0.42).with_relative(0.1));
/// assert_eq!(near.to_string(), "eq=0.42 ± 0.042");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eq: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_eq: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gt: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gte: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lt: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lte: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_in: Option<Vec<ScalarValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_in: Option<Vec<ScalarValue>>,
}

impl Condition {
    /// Creates an unset condition.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equal(mut self, bound: impl Into<NumericBound>) -> Self {
        self.eq = Some(bound.into());
        self
    }

    pub fn not_equal(mut self, bound: impl Into<NumericBound>) -> Self {
        self.not_eq = Some(bound.into());
        self
    }

    pub fn greater_than(mut self, bound: impl Into<NumericBound>) -> Self {
        self.gt = Some(bound.into());
        self
    }

    pub fn greater_or_equal(mut self, bound: impl Into<NumericBound>) -> Self {
        self.gte = Some(bound.into());
        self
    }

    pub fn less_than(mut self, bound: impl Into<NumericBound>) -> Self {
        self.lt = Some(bound.into());
        self
    }

    pub fn less_or_equal(mut self, bound: impl Into<NumericBound>) -> Self {
        self.lte = Some(bound.into());
        self
    }

    /// Requires the value to be one of `values`.
    pub fn is_in<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        self.is_in = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Requires the value to be none of `values`.
    pub fn not_in<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        self.not_in = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if at least one predicate is configured.
    pub fn is_set(&self) -> bool {
        self.eq.is_some()
            || self.not_eq.is_some()
            || self.gt.is_some()
            || self.gte.is_some()
            || self.lt.is_some()
            || self.lte.is_some()
            || self.is_in.is_some()
            || self.not_in.is_some()
    }

    /// Checks `value` against every configured predicate.
    ///
    /// All predicates are evaluated before their outcomes are combined, so a
    /// predicate that cannot be applied is reported even when another one
    /// already fails. An unset condition accepts every value.
    pub fn check_value(&self, value: &ScalarValue) -> Result<bool, ConditionError> {
        let mut outcomes: Vec<Result<bool, ConditionError>> = Vec::new();

        if let Some(bound) = &self.eq {
            outcomes.push(bound.matches("eq", value));
        }
        if let Some(bound) = &self.not_eq {
            outcomes.push(bound.matches("not_eq", value).map(|matched| !matched));
        }
        if let Some(bound) = &self.gt {
            outcomes.push(bound.ordered("gt", value).map(|(v, b)| v > b));
        }
        if let Some(bound) = &self.gte {
            outcomes.push(bound.ordered("gte", value).map(|(v, b)| v >= b));
        }
        if let Some(bound) = &self.lt {
            outcomes.push(bound.ordered("lt", value).map(|(v, b)| v < b));
        }
        if let Some(bound) = &self.lte {
            outcomes.push(bound.ordered("lte", value).map(|(v, b)| v <= b));
        }
        if let Some(values) = &self.is_in {
            outcomes.push(Ok(values.contains(value)));
        }
        if let Some(values) = &self.not_in {
            outcomes.push(Ok(!values.contains(value)));
        }

        let outcomes = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(outcomes.into_iter().all(|passed| passed))
    }

    /// Returns the lower edge of the acceptance band, if any.
    pub fn lower_bound(&self) -> Option<BandEdge> {
        let candidates = [
            exact_edge(self.gt, false),
            exact_edge(self.gte, true),
            self.eq.map(|bound| match bound {
                NumericBound::Exact(v) => BandEdge {
                    value: v,
                    inclusive: true,
                },
                NumericBound::Approx(approx) => BandEdge {
                    value: approx.bounds().0,
                    inclusive: true,
                },
            }),
        ];
        candidates
            .into_iter()
            .flatten()
            .reduce(BandEdge::tighter_lower)
    }

    /// Returns the upper edge of the acceptance band, if any.
    pub fn upper_bound(&self) -> Option<BandEdge> {
        let candidates = [
            exact_edge(self.lt, false),
            exact_edge(self.lte, true),
            self.eq.map(|bound| match bound {
                NumericBound::Exact(v) => BandEdge {
                    value: v,
                    inclusive: true,
                },
                NumericBound::Approx(approx) => BandEdge {
                    value: approx.bounds().1,
                    inclusive: true,
                },
            }),
        ];
        candidates
            .into_iter()
            .flatten()
            .reduce(BandEdge::tighter_upper)
    }
}

fn exact_edge(bound: Option<NumericBound>, inclusive: bool) -> Option<BandEdge> {
    match bound {
        Some(NumericBound::Exact(value)) => Some(BandEdge { value, inclusive }),
        _ => None,
    }
}

fn format_set(values: &[ScalarValue]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let numeric = [
            ("eq", &self.eq),
            ("not_eq", &self.not_eq),
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ];
        for (name, bound) in numeric {
            if let Some(bound) = bound {
                parts.push(format!("{name}={bound}"));
            }
        }
        if let Some(values) = &self.is_in {
            parts.push(format!("is_in={}", format_set(values)));
        }
        if let Some(values) = &self.not_in {
            parts.push(format!("not_in={}", format_set(values)));
        }

        if parts.is_empty() {
            write!(f, "not set")
        } else {
            write!(f, "{}", parts.join(" and "))
        }
    }
}
