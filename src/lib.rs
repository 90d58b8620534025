//! Convergent cross mapping (CCM) causality primitives.
//!
//! Series A is said to drive series B when B's shadow manifold can predict A.
//! Two scores share one embedding and cross-mapping pipeline: classic CCM
//! (Pearson correlation over the full library) and copula-entropy CCM (mutual
//! information averaged over bootstrap libraries).
//!
//! ```no_run
//! use manifold_ccm::{pairwise_causality, CcmConfig};
//!
//! # fn run(x: &[f64], y: &[f64]) -> manifold_ccm::Result<()> {
//! let rho = pairwise_causality(x, y, &CcmConfig::classic(), None)?;
//! let mi = pairwise_causality(x, y, &CcmConfig::copula_entropy().with_seed(42), None)?;
//! println!("x -> y: rho = {rho:.3}, mi = {mi:.3}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crossmap;
pub mod embedding;
pub mod error;
pub mod information;
pub mod matrix;
pub mod pairwise;
pub mod sampling;
pub mod skill;

pub use config::{CcmConfig, FailurePolicy, LibraryStrategy, Metric, Scoring};
pub use error::{CcmError, Result};
pub use matrix::{
    causality_matrix, causality_matrix_from_rows, CancelToken, CausalityMatrix,
    CausalityMatrixBuilder,
};
pub use pairwise::{
    pairwise_causality, permutation_significance, CausalityEngine, ConvergencePoint,
    CrossMapResult, PermutationTest,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn _manifold_ccm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    embedding::register(m)?;
    pairwise::register(m)?;
    matrix::register(m)?;

    Ok(())
}
