use tracing::trace;

use super::neighbors::{nearest_neighbors, NeighborSet};
use super::weights::kernel_weights;
use crate::error::{CcmError, Result};

/// Relation between the query set and the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfExclusion {
    /// Query points are unrelated to library points.
    None,
    /// Query i is library point i and must not be its own neighbor.
    SamePositions,
}

/// Weighted nearest-neighbor predictor over a shadow manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossMapper {
    k: usize,
}

impl CrossMapper {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(CcmError::invalid("neighbors", k, ">= 1"));
        }
        Ok(Self { k })
    }

    /// Mapper using the conventional E+1 neighbors.
    pub fn for_dimension(embedding_dim: usize) -> Self {
        Self {
            k: embedding_dim + 1,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Neighbors of `query` in `library`, skipping `exclude`.
    pub fn neighbors(
        &self,
        library: &[Vec<f64>],
        query: &[f64],
        exclude: Option<usize>,
    ) -> NeighborSet {
        nearest_neighbors(library, query, self.k, exclude)
    }

    /// Predict one value per query point from the library's targets.
    ///
    /// `library_targets[j]` is the value attached to `library_points[j]`; the
    /// prediction for a query is the kernel-weighted mean of its neighbors'
    /// targets.
    pub fn predict(
        &self,
        library_points: &[Vec<f64>],
        library_targets: &[f64],
        query_points: &[Vec<f64>],
        exclusion: SelfExclusion,
    ) -> Result<Vec<f64>> {
        if library_points.len() != library_targets.len() {
            return Err(CcmError::LengthMismatch {
                cause: library_targets.len(),
                effect: library_points.len(),
            });
        }
        if exclusion == SelfExclusion::SamePositions && query_points.len() != library_points.len() {
            return Err(CcmError::LengthMismatch {
                cause: query_points.len(),
                effect: library_points.len(),
            });
        }

        let mut predictions = Vec::with_capacity(query_points.len());
        for (i, query) in query_points.iter().enumerate() {
            let exclude = match exclusion {
                SelfExclusion::SamePositions => Some(i),
                SelfExclusion::None => None,
            };
            let nn = self.neighbors(library_points, query, exclude);
            if nn.is_empty() {
                // every library vector was excluded for this query
                let excluded = exclude.is_some_and(|e| e < library_points.len());
                let admissible = library_points.len() - usize::from(excluded);
                return Err(CcmError::InvalidLibrarySize {
                    requested: library_points.len(),
                    available: admissible,
                });
            }

            let weights = kernel_weights(&nn.distances);
            let value: f64 = nn
                .indices
                .iter()
                .zip(weights.iter())
                .map(|(&j, &w)| w * library_targets[j])
                .sum();
            predictions.push(value);
        }

        trace!(
            library = library_points.len(),
            queries = query_points.len(),
            k = self.k,
            "cross-mapped"
        );
        Ok(predictions)
    }
}
