//! The condition vocabulary shared by every test.
//!
//! A [`Condition`] combines numeric predicates (`eq`, `not_eq`, `gt`, `gte`,
//! `lt`, `lte`) and set predicates (`is_in`, `not_in`) with AND semantics.
//! Equality predicates accept an [`ApproxValue`] to compare within a
//! tolerance band instead of exactly.

mod approx;
#[allow(clippy::module_inception)]
mod condition;
mod value;

pub use approx::{approx, ApproxValue, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_RELATIVE_TOLERANCE};
pub use condition::{BandEdge, Condition, ConditionError, NumericBound};
pub use value::{format_number, round_to, ScalarValue};
