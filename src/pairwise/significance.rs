use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use super::causality::CausalityEngine;
use crate::config::CcmConfig;
use crate::error::{CcmError, Result};

/// Outcome of a permutation test.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationTest {
    /// Skill of the unshuffled pair.
    pub observed: f64,
    /// Share of permuted skills at or above `observed`.
    pub p_value: f64,
    /// Skills obtained with the cause shuffled, in permutation order.
    pub null_distribution: Vec<f64>,
}

/// One-sided upper-tail p-value of `observed` against `null`.
///
/// An undefined observed skill is no evidence (p = 1). Undefined permuted
/// skills never count as exceeding it.
pub fn upper_tail_p_value(observed: f64, null: &[f64]) -> f64 {
    if null.is_empty() || observed.is_nan() {
        return 1.0;
    }
    let exceed = null.iter().filter(|&&s| s >= observed).count();
    exceed as f64 / null.len() as f64
}

impl CausalityEngine {
    /// Permutation test of the causality from `cause` to `effect`.
    ///
    /// Each shuffle of the cause gets its own generator seeded from `rng`, so the
    /// result does not depend on how the permutations are scheduled.
    pub fn permutation_test<R: Rng + ?Sized>(
        &self,
        cause: &[f64],
        effect: &[f64],
        num_permutations: usize,
        rng: &mut R,
    ) -> Result<PermutationTest> {
        if num_permutations == 0 {
            return Err(CcmError::invalid("num_permutations", 0, ">= 1"));
        }

        let observed = self.causality_with_rng(cause, effect, None, rng)?;
        let seeds: Vec<u64> = (0..num_permutations).map(|_| rng.gen()).collect();

        let null_distribution = seeds
            .par_iter()
            .map(|&seed| {
                let mut perm_rng = ChaCha8Rng::seed_from_u64(seed);
                let mut shuffled = cause.to_vec();
                shuffled.shuffle(&mut perm_rng);
                self.causality_with_rng(&shuffled, effect, None, &mut perm_rng)
            })
            .collect::<Result<Vec<f64>>>()?;

        let p_value = upper_tail_p_value(observed, &null_distribution);
        debug!(observed, p_value, num_permutations, "permutation test");

        Ok(PermutationTest {
            observed,
            p_value,
            null_distribution,
        })
    }
}

/// `(observed skill, p-value)` of a permutation test under `config`.
pub fn permutation_significance(
    cause: &[f64],
    effect: &[f64],
    config: &CcmConfig,
    num_permutations: usize,
) -> Result<(f64, f64)> {
    let engine = CausalityEngine::new(config.clone())?;
    let mut rng = engine.rng();
    let test = engine.permutation_test(cause, effect, num_permutations, &mut rng)?;
    Ok((test.observed, test.p_value))
}
