//! Engine configuration.
//!
//! One `CcmConfig` drives both schemes. `classic()` scores the full library with
//! Pearson correlation; `copula_entropy()` bootstraps library subsets and scores
//! them with copula-entropy mutual information.

use serde::{Deserialize, Serialize};

use crate::error::{CcmError, Result};

/// Distance used inside the copula-entropy estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Maximum-coordinate distance.
    #[default]
    Chebyshev,
    /// L2 distance.
    Euclidean,
}

impl std::str::FromStr for Metric {
    type Err = CcmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chebyshev" | "chebychev" => Ok(Metric::Chebyshev),
            "euclidean" => Ok(Metric::Euclidean),
            other => Err(CcmError::invalid("metric", other, "\"chebyshev\" or \"euclidean\"")),
        }
    }
}

/// Skill metric turning predictions into a causality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Pearson correlation between predicted and observed values.
    #[default]
    Pearson,
    /// Mutual information estimated through copula entropy.
    CopulaEntropy,
}

/// How library subsets are chosen for one causality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStrategy {
    /// Leading `lib_size` vectors of the embedding, no resampling.
    #[default]
    Full,
    /// Random subsets over a ladder of library sizes, skills pooled by mean.
    Bootstrap,
}

/// What a matrix build does when a single pair fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole build with the first error.
    #[default]
    Strict,
    /// Store `sentinel` for the failing entry and keep going.
    Lenient { sentinel: f64 },
}

/// Full configuration of a causality engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcmConfig {
    /// Embedding dimension E.
    pub embedding_dim: usize,
    /// Delay tau between embedding coordinates.
    pub tau: usize,
    /// Explicit library-size ladder for bootstrap sampling.
    pub lib_sizes: Option<Vec<usize>>,
    /// Draws per library size.
    pub n_samples: usize,
    /// Draw library indices with replacement.
    pub replace: bool,
    /// Base seed; `None` seeds from OS entropy once per call.
    pub random_seed: Option<u64>,
    /// Neighbor count of the entropy estimator.
    pub k: usize,
    /// Distance of the entropy estimator.
    pub metric: Metric,
    /// Skill measure applied to the cross-map predictions.
    pub scoring: Scoring,
    /// Full library or bootstrap draws over the size ladder.
    pub strategy: LibraryStrategy,
    /// What a matrix build does when one pair fails.
    pub failure_policy: FailurePolicy,
}

impl Default for CcmConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl CcmConfig {
    /// Pearson-scored CCM over the full library (E=3, tau=1).
    pub fn classic() -> Self {
        Self {
            embedding_dim: 3,
            tau: 1,
            lib_sizes: None,
            n_samples: 1,
            replace: false,
            random_seed: None,
            k: 5,
            metric: Metric::Chebyshev,
            scoring: Scoring::Pearson,
            strategy: LibraryStrategy::Full,
            failure_policy: FailurePolicy::Strict,
        }
    }

    /// Copula-entropy CCM with bootstrap sampling (E=2, tau=1, 5 draws, k=5).
    pub fn copula_entropy() -> Self {
        Self {
            embedding_dim: 2,
            n_samples: 5,
            scoring: Scoring::CopulaEntropy,
            strategy: LibraryStrategy::Bootstrap,
            ..Self::classic()
        }
    }

    pub fn with_embedding(mut self, embedding_dim: usize, tau: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self.tau = tau;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_lib_sizes(mut self, lib_sizes: Vec<usize>) -> Self {
        self.lib_sizes = Some(lib_sizes);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Number of cross-map neighbors, E+1.
    pub fn neighbors(&self) -> usize {
        self.embedding_dim + 1
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(CcmError::invalid("embedding_dim", self.embedding_dim, ">= 1"));
        }
        if self.tau == 0 {
            return Err(CcmError::invalid("tau", self.tau, ">= 1"));
        }
        if self.n_samples == 0 {
            return Err(CcmError::invalid("n_samples", self.n_samples, ">= 1"));
        }
        if self.k == 0 {
            return Err(CcmError::invalid("k", self.k, ">= 1"));
        }
        if let Some(sizes) = &self.lib_sizes {
            if sizes.is_empty() {
                return Err(CcmError::invalid("lib_sizes", "[]", "a non-empty list"));
            }
            if let Some(&zero) = sizes.iter().find(|&&l| l == 0) {
                return Err(CcmError::invalid("lib_sizes", zero, "sizes >= 1"));
            }
        }
        if let FailurePolicy::Lenient { sentinel } = self.failure_policy {
            if sentinel.is_infinite() {
                return Err(CcmError::invalid("sentinel", sentinel, "a finite value or NaN"));
            }
        }
        Ok(())
    }
}
