pub mod causality_matrix;

#[cfg(feature = "python")]
mod py;

pub use causality_matrix::{
    causality_matrix, causality_matrix_from_rows, series_from_rows, CancelToken,
    CausalityMatrix, CausalityMatrixBuilder,
};

#[cfg(feature = "python")]
pub fn register(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;

    m.add_function(wrap_pyfunction!(py::ccm_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(py::ce_ccm_matrix, m)?)?;

    Ok(())
}
