//! Skill metrics: one causality score from cross-map predictions.

pub mod copula_mi;
pub mod pearson;

use std::sync::Arc;

pub use copula_mi::CopulaEntropyMi;
pub use pearson::{correlation, Pearson};

use crate::config::{CcmConfig, Scoring};

/// Summarises how well `predicted` tracks `observed`.
pub trait SkillMetric: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, predicted: &[f64], observed: &[f64]) -> f64;
}

/// The metric selected by `config.scoring`.
pub fn from_config(config: &CcmConfig) -> Arc<dyn SkillMetric> {
    match config.scoring {
        Scoring::Pearson => Arc::new(Pearson),
        Scoring::CopulaEntropy => Arc::new(CopulaEntropyMi::new(config.k, config.metric)),
    }
}
