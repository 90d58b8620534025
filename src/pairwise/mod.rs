pub mod causality;
pub mod convergence;
pub mod significance;

#[cfg(feature = "python")]
mod py;

pub use causality::{pairwise_causality, CausalityEngine, CrossMapResult};
pub use convergence::ConvergencePoint;
pub use significance::{permutation_significance, upper_tail_p_value, PermutationTest};

#[cfg(feature = "python")]
pub fn register(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;

    // causality
    m.add_function(wrap_pyfunction!(py::ccm, m)?)?;
    m.add_function(wrap_pyfunction!(py::ce_ccm, m)?)?;
    m.add_function(wrap_pyfunction!(py::cross_map, m)?)?;

    // significance
    m.add_function(wrap_pyfunction!(py::permutation_test, m)?)?;

    // convergence
    m.add_function(wrap_pyfunction!(py::ccm_convergence, m)?)?;

    Ok(())
}
