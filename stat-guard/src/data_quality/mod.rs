//! Built-in data quality tests.
//!
//! Each family is one [`Test`](crate::core::Test) implementation with a
//! closed set of variants:
//!
//! | Family | Variants | Default threshold |
//! |---|---|---|
//! | [`FeatureValueTest`] | [`FeatureStatistic`] | most common value share only |
//! | [`StabilityTest`] | [`StabilitySubject`] | zero |
//! | [`CorrelationTest`] | [`CorrelationKind`] | none |
//! | [`ValueRangeTest`] | [`RangeMeasure`] | zero |
//! | [`ValueListTest`] | [`ListMeasure`] | zero |
//! | [`ValueQuantileTest`] | | none |
//! | [`MeanInNSigmasTest`] | | sigma window |

mod correlation;
mod feature;
mod mean_in_sigmas;
mod quantile;
mod stability;
mod value_list;
mod value_range;

pub use correlation::{CorrelationKind, CorrelationTest, CorrelationTestBuilder};
pub use feature::{FeatureStatistic, FeatureValueTest, FeatureValueTestBuilder};
pub use mean_in_sigmas::{MeanInNSigmasTest, MeanInNSigmasTestBuilder};
pub use quantile::{ValueQuantileTest, ValueQuantileTestBuilder};
pub use stability::{StabilitySubject, StabilityTest, StabilityTestBuilder};
pub use value_list::{ListMeasure, ValueListTest, ValueListTestBuilder};
pub use value_range::{RangeMeasure, ValueRangeTest, ValueRangeTestBuilder};

use crate::condition::format_number;

/// Formats an interval such as `[0, 100]`; a missing edge is unbounded.
pub(crate) fn format_interval(left: Option<f64>, right: Option<f64>) -> String {
    let left = left.map(format_number).unwrap_or_else(|| "-inf".to_string());
    let right = right.map(format_number).unwrap_or_else(|| "inf".to_string());
    format!("[{left}, {right}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Some(0.0), Some(100.0)), "[0, 100]");
        assert_eq!(format_interval(None, Some(1.5)), "[-inf, 1.5]");
        assert_eq!(format_interval(Some(-2.0), None), "[-2, inf]");
    }
}
