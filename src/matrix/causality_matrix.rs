use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{CcmConfig, FailurePolicy};
use crate::error::{CcmError, Result};
use crate::pairwise::CausalityEngine;

/// Square causality matrix, row-major.
///
/// `get(effect, cause)` is the strength of the link cause -> effect. The
/// diagonal is 1.0 by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct CausalityMatrix {
    n: usize,
    values: Vec<f64>,
}

/// Unchecked serialized form of [`CausalityMatrix`].
#[derive(Deserialize)]
struct RawMatrix {
    n: usize,
    values: Vec<f64>,
}

impl TryFrom<RawMatrix> for CausalityMatrix {
    type Error = CcmError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Self::from_values(raw.n, raw.values)
    }
}

impl CausalityMatrix {
    /// Matrix with ones on the diagonal and `fill` elsewhere.
    pub fn new(n: usize, fill: f64) -> Self {
        let mut values = vec![fill; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        Self { n, values }
    }

    /// Matrix over `n` series from `n * n` row-major values.
    pub fn from_values(n: usize, values: Vec<f64>) -> Result<Self> {
        if n.checked_mul(n) != Some(values.len()) {
            return Err(CcmError::invalid(
                "values",
                values.len(),
                "exactly n * n row-major entries",
            ));
        }
        Ok(Self { n, values })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, effect: usize, cause: usize) -> f64 {
        self.values[effect * self.n + cause]
    }

    fn set(&mut self, effect: usize, cause: usize, value: f64) {
        self.values[effect * self.n + cause] = value;
    }

    /// Row `effect`: the strength of every series driving it.
    pub fn row(&self, effect: usize) -> &[f64] {
        &self.values[effect * self.n..(effect + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.n.max(1))
    }

    pub fn to_vec2(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

/// Shared flag a batch driver raises to stop a matrix build between pairs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs every ordered pair of a series collection through a causality engine.
#[derive(Debug, Clone)]
pub struct CausalityMatrixBuilder {
    engine: CausalityEngine,
    lib_size: Option<usize>,
    cancel: Option<CancelToken>,
}

impl CausalityMatrixBuilder {
    pub fn new(config: CcmConfig) -> Result<Self> {
        Ok(Self::from_engine(CausalityEngine::new(config)?))
    }

    pub fn from_engine(engine: CausalityEngine) -> Self {
        Self {
            engine,
            lib_size: None,
            cancel: None,
        }
    }

    pub fn lib_size(mut self, lib_size: Option<usize>) -> Self {
        self.lib_size = lib_size;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// `M[j, i]` = causality from series i to series j, for all i != j.
    ///
    /// Pair p draws from stream p of a generator keyed by the configured seed, so
    /// the matrix is reproducible under any thread count.
    pub fn build(&self, series: &[Vec<f64>]) -> Result<CausalityMatrix> {
        let n = series.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|cause| (0..n).filter(move |&e| e != cause).map(move |e| (cause, e)))
            .collect();
        let total = pairs.len();
        let base_seed = self
            .engine
            .config()
            .random_seed
            .unwrap_or_else(|| ChaCha8Rng::from_entropy().next_u64());
        debug!(series = n, pairs = total, "building causality matrix");

        let outcomes: Vec<Option<Result<f64>>> = pairs
            .par_iter()
            .enumerate()
            .map(|(p, &(cause, effect))| {
                if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    return None;
                }
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
                rng.set_stream(p as u64);
                Some(self.engine.causality_with_rng(
                    &series[cause],
                    &series[effect],
                    self.lib_size,
                    &mut rng,
                ))
            })
            .collect();

        let completed = outcomes.iter().filter(|o| o.is_some()).count();
        if completed < total {
            return Err(CcmError::Cancelled { completed, total });
        }

        let mut matrix = CausalityMatrix::new(n, 0.0);
        for (&(cause, effect), outcome) in pairs.iter().zip(outcomes.into_iter().flatten()) {
            let value = match (outcome, self.engine.config().failure_policy) {
                (Ok(value), _) => value,
                (Err(err), FailurePolicy::Strict) => return Err(err),
                (Err(err), FailurePolicy::Lenient { sentinel }) => {
                    warn!(cause, effect, error = %err, "pair failed, storing sentinel");
                    sentinel
                }
            };
            matrix.set(effect, cause, value);
        }
        Ok(matrix)
    }
}

/// Transpose a `[n_samples][n_series]` table into one vector per series.
pub fn series_from_rows(rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n_series = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|r| r.len() != n_series) {
        return Err(CcmError::LengthMismatch {
            cause: n_series,
            effect: bad.len(),
        });
    }
    Ok((0..n_series)
        .map(|s| rows.iter().map(|r| r[s]).collect())
        .collect())
}

/// Causality matrix of `series` under `config`.
pub fn causality_matrix(
    series: &[Vec<f64>],
    config: &CcmConfig,
    lib_size: Option<usize>,
) -> Result<CausalityMatrix> {
    CausalityMatrixBuilder::new(config.clone())?
        .lib_size(lib_size)
        .build(series)
}

/// Causality matrix of a `[n_samples][n_series]` table.
pub fn causality_matrix_from_rows(
    rows: &[Vec<f64>],
    config: &CcmConfig,
    lib_size: Option<usize>,
) -> Result<CausalityMatrix> {
    causality_matrix(&series_from_rows(rows)?, config, lib_size)
}
