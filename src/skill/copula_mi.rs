use std::sync::Arc;

use tracing::debug;

use super::SkillMetric;
use crate::config::Metric;
use crate::information::{CopulaEntropyEstimator, KnnCopulaEntropy};

/// Mutual information between predicted and observed values, via copula entropy.
///
/// The neighbor count is capped at `n - 1`. Estimates below zero are sampling
/// noise of the estimator and are reported as 0.
#[derive(Clone)]
pub struct CopulaEntropyMi {
    k: usize,
    estimator: Arc<dyn CopulaEntropyEstimator>,
}

impl CopulaEntropyMi {
    pub fn new(k: usize, metric: Metric) -> Self {
        Self::with_estimator(k, Arc::new(KnnCopulaEntropy::new(metric)))
    }

    pub fn with_estimator(k: usize, estimator: Arc<dyn CopulaEntropyEstimator>) -> Self {
        Self { k, estimator }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl std::fmt::Debug for CopulaEntropyMi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopulaEntropyMi").field("k", &self.k).finish_non_exhaustive()
    }
}

impl SkillMetric for CopulaEntropyMi {
    fn name(&self) -> &'static str {
        "copula_entropy_mi"
    }

    fn score(&self, predicted: &[f64], observed: &[f64]) -> f64 {
        let n = predicted.len().min(observed.len());
        let k = self.k.min(n.saturating_sub(1));
        if k == 0 {
            return 0.0;
        }

        let sample: Vec<[f64; 2]> = predicted
            .iter()
            .zip(observed.iter())
            .map(|(&p, &o)| [p, o])
            .collect();
        match self.estimator.estimate(&sample, k) {
            Ok(h) if (-h).is_finite() => (-h).max(0.0),
            Ok(h) => {
                debug!(entropy = h, "non-finite copula entropy, scoring 0");
                0.0
            }
            Err(err) => {
                debug!(error = %err, "copula entropy unavailable, scoring 0");
                0.0
            }
        }
    }
}
