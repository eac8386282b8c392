//! Tolerant values for approximate equality.

use super::value::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative tolerance used when neither tolerance is specified.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-6;

/// Absolute tolerance used when neither tolerance is specified.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-12;

/// Rounding slack, in units of machine epsilon, applied at the band edges.
const EDGE_SLACK_ULPS: f64 = 4.0;

fn edge_slack(magnitude: f64) -> f64 {
    EDGE_SLACK_ULPS * f64::EPSILON * magnitude
}

/// A target number with an acceptance band around it.
///
/// The band half-width is `max(relative * |value|, absolute)` and the band is
/// inclusive. If neither tolerance is given the defaults apply; if only one is
/// given, the other is not considered.
///
/// # Examples
///
/// ```rust
/// use stat_guard::condition::ApproxValue;
///
/// let target = ApproxValue::new(10.0).with_relative(0.1);
/// assert!(target.contains(9.0));
/// assert!(target.contains(11.0));
/// assert!(!target.contains(11.1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApproxValue {
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relative: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    absolute: Option<f64>,
}

impl ApproxValue {
    /// Creates a tolerant value with the default tolerances.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            relative: None,
            absolute: None,
        }
    }

    /// Sets the relative tolerance, as a fraction of the target.
    pub fn with_relative(mut self, relative: f64) -> Self {
        self.relative = Some(relative.abs());
        self
    }

    /// Sets the absolute tolerance.
    pub fn with_absolute(mut self, absolute: f64) -> Self {
        self.absolute = Some(absolute.abs());
        self
    }

    /// Returns the target value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the half-width of the acceptance band.
    pub fn tolerance(&self) -> f64 {
        let relative_band = |r: f64| r * self.value.abs();
        match (self.relative, self.absolute) {
            (None, None) => {
                relative_band(DEFAULT_RELATIVE_TOLERANCE).max(DEFAULT_ABSOLUTE_TOLERANCE)
            }
            (Some(r), None) => relative_band(r),
            (None, Some(a)) => a,
            (Some(r), Some(a)) => relative_band(r).max(a),
        }
    }

    /// Returns the inclusive `(lower, upper)` edges of the band.
    ///
    /// The edges are widened by a few ULPs so that `0.42 ± 0.042` reaches
    /// both `0.378` and `0.462`.
    pub fn bounds(&self) -> (f64, f64) {
        let tolerance = self.tolerance();
        let half_width = tolerance + edge_slack(self.value.abs() + tolerance);
        (self.value - half_width, self.value + half_width)
    }

    /// Returns true if `observed` lies within the band.
    pub fn contains(&self, observed: f64) -> bool {
        if observed == self.value {
            return true;
        }
        let slack = edge_slack(self.value.abs().max(observed.abs()));
        (observed - self.value).abs() <= self.tolerance() + slack
    }
}

/// Shorthand for [`ApproxValue::new`].
pub fn approx(value: f64) -> ApproxValue {
    ApproxValue::new(value)
}

impl fmt::Display for ApproxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ± {}",
            format_number(self.value),
            format_number(self.tolerance())
        )
    }
}
