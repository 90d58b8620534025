pub mod delay;

#[cfg(feature = "python")]
mod py;

pub use delay::{
    embed, embedding_len, optimal_delay, optimal_dimension, DelayMethod, DimensionMethod,
    Embedding,
};

#[cfg(feature = "python")]
pub fn register(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;

    m.add_function(wrap_pyfunction!(py::time_delay_embedding, m)?)?;
    m.add_function(wrap_pyfunction!(py::optimal_delay, m)?)?;
    m.add_function(wrap_pyfunction!(py::optimal_dimension, m)?)?;

    Ok(())
}
