use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use statrs::function::gamma::{digamma, ln_gamma};

use crate::config::Metric;
use crate::error::{CcmError, Result};

/// Entropy estimate of the empirical copula of a two-column sample.
///
/// Implementations must accept `1 <= k < sample.len()` and return a finite value.
/// Mutual information is the negated copula entropy.
pub trait CopulaEntropyEstimator: Send + Sync {
    fn estimate(&self, sample: &[[f64; 2]], k: usize) -> Result<f64>;
}

/// Kozachenko-Leonenko k-nearest-neighbor estimator on rank-transformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KnnCopulaEntropy {
    pub metric: Metric,
}

impl KnnCopulaEntropy {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    fn distance(&self, a: &[f64; 2], b: &[f64; 2]) -> f64 {
        let dx = (a[0] - b[0]).abs();
        let dy = (a[1] - b[1]).abs();
        match self.metric {
            Metric::Chebyshev => dx.max(dy),
            Metric::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }

    /// ln of the unit-ball volume for d = 2 (radius 1/2 normalisation).
    fn log_unit_volume(&self) -> f64 {
        const D: f64 = 2.0;
        match self.metric {
            Metric::Chebyshev => 0.0,
            Metric::Euclidean => {
                (D / 2.0) * std::f64::consts::PI.ln() - D * 2f64.ln() - ln_gamma(1.0 + D / 2.0)
            }
        }
    }
}

/// Seed of the tie-breaking keys; column `c` reads ChaCha stream `c`.
const TIE_SEED: u64 = 0x7ec0_9a1e;

/// Ordinal ranks scaled to (0, 1].
///
/// Equal values are ordered by a pseudo-random key drawn independently for each
/// column, which acts like infinitesimal jitter: ties carry no shared ordering
/// between the columns, so discrete or constant data shows no spurious
/// dependence. The keys are fixed, so the copula is deterministic.
pub fn empirical_copula(sample: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let n = sample.len();
    let mut copula = vec![[0.0; 2]; n];
    for col in 0..2 {
        let mut rng = ChaCha8Rng::seed_from_u64(TIE_SEED);
        rng.set_stream(col as u64);
        let keys: Vec<u64> = (0..n).map(|_| rng.next_u64()).collect();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            sample[a][col]
                .total_cmp(&sample[b][col])
                .then(keys[a].cmp(&keys[b]))
        });
        for (rank, &i) in order.iter().enumerate() {
            copula[i][col] = (rank + 1) as f64 / n as f64;
        }
    }
    copula
}

impl CopulaEntropyEstimator for KnnCopulaEntropy {
    fn estimate(&self, sample: &[[f64; 2]], k: usize) -> Result<f64> {
        let n = sample.len();
        if k == 0 || k >= n {
            return Err(CcmError::Estimator(format!(
                "neighbor count {k} outside 1..{n} for {n} samples"
            )));
        }
        if sample.iter().flatten().any(|v| !v.is_finite()) {
            return Err(CcmError::Estimator("sample contains non-finite values".into()));
        }

        let u = empirical_copula(sample);
        let mut dists = Vec::with_capacity(n - 1);
        let mut log_sum = 0.0;
        for i in 0..n {
            dists.clear();
            dists.extend((0..n).filter(|&j| j != i).map(|j| self.distance(&u[i], &u[j])));
            let (_, kth, _) = dists.select_nth_unstable_by(k - 1, f64::total_cmp);
            // distinct ranks keep every pairwise distance >= 1/n
            log_sum += (2.0 * *kth).ln();
        }

        let d = 2.0;
        Ok(digamma(n as f64) - digamma(k as f64) + self.log_unit_volume() + d * log_sum / n as f64)
    }
}
