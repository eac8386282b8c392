//! Explicit thresholds and default-threshold derivation.

use super::test::CheckError;
use crate::condition::{approx, Condition};
use crate::error::{GuardError, Result};
use serde::{Deserialize, Serialize};

/// Relative tolerance around a reference statistic.
pub const REFERENCE_RELATIVE_TOLERANCE: f64 = 0.1;

/// Ceiling for the most common value share when no reference is available.
pub const MOST_COMMON_VALUE_SHARE_CEILING: f64 = 0.8;

/// Default width, in reference standard deviations, of the mean window.
pub const DEFAULT_N_SIGMAS: f64 = 2.0;

/// Reference statistics a policy may derive a condition from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// No reference data
    Absent,
    /// The reference dataset's value of the tested statistic
    Value(f64),
    /// Reference mean and standard deviation
    Distribution { mean: f64, std: f64 },
}

/// How a test synthesizes its condition when the caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Tolerant equality to zero.
    ZeroTolerance,
    /// Tolerant equality around the reference value, or a ceiling without one.
    ReferenceRelative { relative: f64, fallback_ceiling: f64 },
    /// The value must stay below `ceiling`, whatever the reference data.
    ///
    /// No built-in family uses it; it is available to custom [`Test`](super::Test)
    /// implementations.
    FixedCeiling { ceiling: f64 },
    /// Strict window of `n_sigmas` reference deviations around the reference mean.
    SigmaWindow { n_sigmas: f64 },
    /// No default; an explicit condition is required.
    ExplicitOnly,
}

impl ThresholdPolicy {
    /// The policy of most-common-value share tests.
    pub fn reference_relative() -> Self {
        ThresholdPolicy::ReferenceRelative {
            relative: REFERENCE_RELATIVE_TOLERANCE,
            fallback_ceiling: MOST_COMMON_VALUE_SHARE_CEILING,
        }
    }

    /// Returns true if this policy can synthesize a condition.
    pub fn has_default(&self) -> bool {
        !matches!(self, ThresholdPolicy::ExplicitOnly)
    }

    /// Derives the condition for `baseline`.
    ///
    /// Pure and deterministic, so renderers can call it again and get the
    /// same condition the check used.
    pub fn derive(&self, baseline: &Baseline) -> std::result::Result<Condition, CheckError> {
        match (*self, *baseline) {
            (ThresholdPolicy::ZeroTolerance, _) => Ok(Condition::new().equal(approx(0.0))),
            (
                ThresholdPolicy::ReferenceRelative { relative, .. },
                Baseline::Value(reference) | Baseline::Distribution { mean: reference, .. },
            ) => Ok(Condition::new().equal(approx(reference).with_relative(relative))),
            (ThresholdPolicy::ReferenceRelative { fallback_ceiling, .. }, Baseline::Absent) => {
                Ok(Condition::new().less_than(fallback_ceiling))
            }
            (ThresholdPolicy::FixedCeiling { ceiling }, _) => {
                Ok(Condition::new().less_than(ceiling))
            }
            (ThresholdPolicy::SigmaWindow { n_sigmas }, Baseline::Distribution { mean, std }) => {
                let width = n_sigmas * std;
                Ok(Condition::new()
                    .greater_than(mean - width)
                    .less_than(mean + width))
            }
            (ThresholdPolicy::SigmaWindow { .. }, _) => Err(CheckError::MissingReference(
                "Reference mean and standard deviation are required".to_string(),
            )),
            (ThresholdPolicy::ExplicitOnly, _) => Err(CheckError::MissingInput(
                "No condition was configured for this test".to_string(),
            )),
        }
    }
}

/// Whether a test's condition was given by the caller or is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionMode {
    Explicit,
    Derived,
}

/// The threshold of a test, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    Explicit(Condition),
    Derived(ThresholdPolicy),
}

impl Threshold {
    /// Chooses between the caller's condition and the family's policy.
    ///
    /// Fails if the explicit condition is empty, or if no condition is given
    /// for a family without a default.
    pub fn resolve(explicit: Option<Condition>, policy: ThresholdPolicy) -> Result<Self> {
        match explicit {
            Some(condition) if !condition.is_set() => Err(GuardError::configuration(
                "the condition has no bound set",
            )),
            Some(condition) => Ok(Threshold::Explicit(condition)),
            None if policy.has_default() => Ok(Threshold::Derived(policy)),
            None => Err(GuardError::configuration(
                "a condition is required for this test",
            )),
        }
    }

    pub fn mode(&self) -> ConditionMode {
        match self {
            Threshold::Explicit(_) => ConditionMode::Explicit,
            Threshold::Derived(_) => ConditionMode::Derived,
        }
    }

    /// Returns the caller's condition, if explicit.
    pub fn explicit(&self) -> Option<&Condition> {
        match self {
            Threshold::Explicit(condition) => Some(condition),
            Threshold::Derived(_) => None,
        }
    }

    /// Returns the derivation policy, if derived.
    pub fn policy(&self) -> Option<ThresholdPolicy> {
        match self {
            Threshold::Explicit(_) => None,
            Threshold::Derived(policy) => Some(*policy),
        }
    }
}
