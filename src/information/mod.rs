//! Information-theoretic estimators.

pub mod copula_entropy;

pub use copula_entropy::{empirical_copula, CopulaEntropyEstimator, KnnCopulaEntropy};
