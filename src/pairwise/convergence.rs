use rand::Rng;
use serde::Serialize;

use super::causality::{CausalityEngine, DrawSkill};
use crate::error::Result;

/// Mean cross-map skill at one library size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergencePoint {
    pub library_size: usize,
    pub mean_skill: f64,
    /// Population standard deviation across draws.
    pub std_skill: f64,
    /// Draws with a defined skill.
    pub samples: usize,
}

impl CausalityEngine {
    /// Skill against library size over the bootstrap ladder.
    ///
    /// Skill that keeps rising with library size is the convergence signature of
    /// a causal link. Uses bootstrap draws whatever the configured strategy.
    pub fn convergence<R: Rng + ?Sized>(
        &self,
        cause: &[f64],
        effect: &[f64],
        rng: &mut R,
    ) -> Result<Vec<ConvergencePoint>> {
        let aligned = self.align(cause, effect)?;
        let skills = self.bootstrap(&aligned, None, rng)?;
        Ok(summarize(&skills))
    }
}

fn summarize(skills: &[DrawSkill]) -> Vec<ConvergencePoint> {
    let mut curve: Vec<ConvergencePoint> = Vec::new();
    let mut start = 0;
    while start < skills.len() {
        let size = skills[start].size;
        let end = start
            + skills[start..]
                .iter()
                .take_while(|s| s.size == size)
                .count();
        let values: Vec<f64> = skills[start..end]
            .iter()
            .map(|s| s.skill)
            .filter(|s| s.is_finite())
            .collect();

        let (mean_skill, std_skill) = if values.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            (mean, var.sqrt())
        };
        curve.push(ConvergencePoint {
            library_size: size,
            mean_skill,
            std_skill,
            samples: values.len(),
        });
        start = end;
    }
    curve
}
