//! Nearest-neighbor cross mapping over shadow manifolds.

pub mod neighbors;
pub mod predictor;
pub mod weights;

pub use neighbors::{nearest_neighbors, NeighborSet};
pub use predictor::{CrossMapper, SelfExclusion};
pub use weights::kernel_weights;
