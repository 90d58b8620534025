use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::{CcmConfig, LibraryStrategy};
use crate::crossmap::{CrossMapper, SelfExclusion};
use crate::embedding::{embed, Embedding};
use crate::error::{CcmError, Result};
use crate::sampling::{LibraryDraw, LibrarySampler};
use crate::skill::{self, SkillMetric};

/// Cross-map predictions of the cause from the effect's manifold.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossMapResult {
    /// Cause values predicted at each library vector.
    pub predicted: Vec<f64>,
    /// Cause values actually observed there.
    pub observed: Vec<f64>,
    /// Skill of `predicted` against `observed`.
    pub skill: f64,
}

/// Skill of one bootstrap library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DrawSkill {
    pub size: usize,
    pub skill: f64,
}

/// Effect manifold with the cause series aligned to it.
pub(crate) struct Aligned {
    pub manifold: Embedding,
    pub cause: Vec<f64>,
}

/// Convergent cross mapping with a pluggable skill metric.
///
/// Tests "cause drives effect" by reconstructing the effect's shadow manifold and
/// predicting the cause from it: a driven system carries a recoverable trace of
/// its driver.
#[derive(Clone)]
pub struct CausalityEngine {
    config: CcmConfig,
    metric: Arc<dyn SkillMetric>,
    mapper: CrossMapper,
    sampler: LibrarySampler,
}

impl std::fmt::Debug for CausalityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CausalityEngine")
            .field("config", &self.config)
            .field("metric", &self.metric.name())
            .finish()
    }
}

impl CausalityEngine {
    pub fn new(config: CcmConfig) -> Result<Self> {
        let metric = skill::from_config(&config);
        Self::with_metric(config, metric)
    }

    /// Engine scoring with `metric` instead of the one named by `config.scoring`.
    pub fn with_metric(config: CcmConfig, metric: Arc<dyn SkillMetric>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mapper: CrossMapper::for_dimension(config.embedding_dim),
            sampler: LibrarySampler::from_config(&config),
            metric,
            config,
        })
    }

    pub fn config(&self) -> &CcmConfig {
        &self.config
    }

    pub fn metric(&self) -> &dyn SkillMetric {
        self.metric.as_ref()
    }

    /// Fresh generator: seeded from `random_seed`, or from OS entropy.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.config.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Causality strength from `cause` to `effect`.
    ///
    /// Every call with a seeded configuration draws the same libraries.
    pub fn causality(&self, cause: &[f64], effect: &[f64], lib_size: Option<usize>) -> Result<f64> {
        let mut rng = self.rng();
        self.causality_with_rng(cause, effect, lib_size, &mut rng)
    }

    /// Like [`causality`](Self::causality), drawing libraries from `rng`.
    pub fn causality_with_rng<R: Rng + ?Sized>(
        &self,
        cause: &[f64],
        effect: &[f64],
        lib_size: Option<usize>,
        rng: &mut R,
    ) -> Result<f64> {
        let aligned = self.align(cause, effect)?;
        match self.config.strategy {
            LibraryStrategy::Full => Ok(self.full_library(&aligned, lib_size)?.skill),
            LibraryStrategy::Bootstrap => {
                let skills = self.bootstrap(&aligned, lib_size, rng)?;
                let score = pooled_mean(&skills);
                debug!(draws = skills.len(), score, "bootstrap causality");
                Ok(score)
            }
        }
    }

    /// Predictions over the leading `lib_size` vectors (all by default).
    pub fn cross_map(
        &self,
        cause: &[f64],
        effect: &[f64],
        lib_size: Option<usize>,
    ) -> Result<CrossMapResult> {
        let aligned = self.align(cause, effect)?;
        self.full_library(&aligned, lib_size)
    }

    pub(crate) fn align(&self, cause: &[f64], effect: &[f64]) -> Result<Aligned> {
        if cause.len() != effect.len() {
            return Err(CcmError::LengthMismatch {
                cause: cause.len(),
                effect: effect.len(),
            });
        }
        let manifold = embed(effect, self.config.embedding_dim, self.config.tau)?;
        let offset = manifold.offset();
        let cause = cause[offset..offset + manifold.len()].to_vec();
        Ok(Aligned { manifold, cause })
    }

    fn score_library(&self, points: &[Vec<f64>], cause: &[f64]) -> Result<(Vec<f64>, f64)> {
        let predicted = self
            .mapper
            .predict(points, cause, points, SelfExclusion::SamePositions)?;
        let skill = self.metric.score(&predicted, cause);
        Ok((predicted, skill))
    }

    fn full_library(&self, aligned: &Aligned, lib_size: Option<usize>) -> Result<CrossMapResult> {
        let available = aligned.manifold.len();
        let size = lib_size.unwrap_or(available);
        if size < 2 {
            return Err(CcmError::InvalidLibrarySize {
                requested: size,
                available,
            });
        }
        let library = aligned.manifold.prefix(size)?;
        let observed = aligned.cause[..size].to_vec();
        let (predicted, skill) = self.score_library(&library.points, &observed)?;
        Ok(CrossMapResult {
            predicted,
            observed,
            skill,
        })
    }

    /// Skill of every bootstrap draw, in ladder order.
    pub(crate) fn bootstrap<R: Rng + ?Sized>(
        &self,
        aligned: &Aligned,
        lib_size: Option<usize>,
        rng: &mut R,
    ) -> Result<Vec<DrawSkill>> {
        let n = aligned.manifold.len();
        let ladder = self.sampler.ladder(lib_size, n)?;
        let plan = self.sampler.plan(&ladder, n, rng);

        plan.par_iter()
            .map(|draw| self.score_draw(aligned, draw))
            .collect()
    }

    fn score_draw(&self, aligned: &Aligned, draw: &LibraryDraw) -> Result<DrawSkill> {
        let library = aligned.manifold.select(&draw.indices);
        let cause: Vec<f64> = draw.indices.iter().map(|&i| aligned.cause[i]).collect();
        let (_, skill) = self.score_library(&library.points, &cause)?;
        Ok(DrawSkill {
            size: draw.size,
            skill,
        })
    }
}

/// Mean of the finite draw skills; `NaN` if all are undefined, 0 with no draws.
fn pooled_mean(skills: &[DrawSkill]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let finite: Vec<f64> = skills.iter().map(|s| s.skill).filter(|s| s.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

/// Causality from `cause` to `effect` under `config`.
pub fn pairwise_causality(
    cause: &[f64],
    effect: &[f64],
    config: &CcmConfig,
    lib_size: Option<usize>,
) -> Result<f64> {
    CausalityEngine::new(config.clone())?.causality(cause, effect, lib_size)
}
