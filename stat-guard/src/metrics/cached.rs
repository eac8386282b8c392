//! Compute-once metric cache.

use super::calculations::MetricCalculation;
use super::errors::{MetricError, MetricResult};
use super::source::StatisticsSource;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// A metric whose snapshot is obtained at most once.
///
/// The first call to [`get_result`](Self::get_result) asks the source and
/// publishes the outcome; concurrent first callers block until it is
/// published. Failures are cached as well, so a failing source is asked only
/// once. The snapshot is never mutated afterwards, which lets any number of
/// tests share one instance through an `Arc`.
pub struct CachedMetric<C: MetricCalculation> {
    calculation: C,
    source: Option<Arc<dyn StatisticsSource>>,
    cell: OnceCell<MetricResult<C::Output>>,
}

impl<C: MetricCalculation> CachedMetric<C> {
    /// Creates a metric computed lazily from `source`.
    pub fn new(calculation: C, source: Arc<dyn StatisticsSource>) -> Self {
        Self {
            calculation,
            source: Some(source),
            cell: OnceCell::new(),
        }
    }

    /// Creates a metric from an already computed snapshot.
    pub fn precomputed(calculation: C, output: C::Output) -> Self {
        Self {
            calculation,
            source: None,
            cell: OnceCell::with_value(Ok(output)),
        }
    }

    /// Returns the metric's parameters.
    pub fn calculation(&self) -> &C {
        &self.calculation
    }

    /// Returns the cached snapshot, computing it on first access.
    pub fn get_result(&self) -> MetricResult<&C::Output> {
        self.cell
            .get_or_init(|| self.compute())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns true once the snapshot (or its failure) has been published.
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    fn compute(&self) -> MetricResult<C::Output> {
        let metric = self.calculation.name();
        let Some(source) = &self.source else {
            return Err(MetricError::unavailable(metric, "no statistics source"));
        };

        let start = Instant::now();
        let result = self.calculation.compute(source.as_ref());
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(_) => debug!(metric = %metric, elapsed_us, "Metric computed"),
            Err(e) => warn!(metric = %metric, elapsed_us, error = %e, "Metric computation failed"),
        }
        result
    }
}

impl<C: MetricCalculation> fmt::Debug for CachedMetric<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMetric")
            .field("calculation", &self.calculation)
            .field("computed", &self.is_computed())
            .finish()
    }
}
