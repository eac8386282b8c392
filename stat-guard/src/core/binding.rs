//! Ownership of a test's metric.

use crate::error::{GuardError, Result};
use crate::metrics::{CachedMetric, MetricCalculation, MetricResult, StatisticsSource};
use std::fmt::Debug;
use std::sync::Arc;

/// The metric a test reads its value from.
///
/// `Shared` metrics are supplied by the caller and may back several tests;
/// `Owned` metrics are built by the test from its parameters. Either way the
/// snapshot is computed at most once.
#[derive(Debug)]
pub enum MetricBinding<C: MetricCalculation> {
    Shared(Arc<CachedMetric<C>>),
    Owned(CachedMetric<C>),
}

impl<C: MetricCalculation> MetricBinding<C> {
    /// Binds either a caller-supplied metric or one built over `source`.
    ///
    /// Exactly one of `metric` and `source` must be given. `calculation` is
    /// only invoked for the source route.
    pub fn from_parts<F>(
        metric: Option<Arc<CachedMetric<C>>>,
        source: Option<Arc<dyn StatisticsSource>>,
        calculation: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<C>,
    {
        match (metric, source) {
            (Some(_), Some(_)) => Err(GuardError::configuration(
                "supply either a metric or a statistics source, not both",
            )),
            (None, None) => Err(GuardError::configuration(
                "a metric or a statistics source is required",
            )),
            (Some(metric), None) => Ok(MetricBinding::Shared(metric)),
            (None, Some(source)) => Ok(MetricBinding::Owned(CachedMetric::new(
                calculation()?,
                source,
            ))),
        }
    }

    pub fn metric(&self) -> &CachedMetric<C> {
        match self {
            MetricBinding::Shared(metric) => metric.as_ref(),
            MetricBinding::Owned(metric) => metric,
        }
    }

    pub fn calculation(&self) -> &C {
        self.metric().calculation()
    }

    pub fn get_result(&self) -> MetricResult<&C::Output> {
        self.metric().get_result()
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, MetricBinding::Shared(_))
    }
}

/// Rejects a construction parameter that disagrees with the bound metric.
pub(crate) fn ensure_matches<T>(parameter: &str, given: Option<&T>, bound: &T) -> Result<()>
where
    T: PartialEq + Debug + ?Sized,
{
    match given {
        Some(given) if given != bound => Err(GuardError::configuration(format!(
            "test parameter '{parameter}' ({given:?}) conflicts with the metric's {bound:?}"
        ))),
        _ => Ok(()),
    }
}
