use numpy::{PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;

use super::causality_matrix::causality_matrix;
use crate::config::{CcmConfig, FailurePolicy};

fn columns(data: &PyReadonlyArray2<f64>) -> Vec<Vec<f64>> {
    let arr = data.as_array();
    arr.columns().into_iter().map(|c| c.to_vec()).collect()
}

fn policy(lenient: bool, sentinel: f64) -> FailurePolicy {
    if lenient {
        FailurePolicy::Lenient { sentinel }
    } else {
        FailurePolicy::Strict
    }
}

/// Classic CCM causality matrix of a (n_samples, n_series) array.
/// Entry (j, i) is the causality from series i to series j.
#[pyfunction]
#[pyo3(signature = (data, embedding_dim=3, tau=1, lib_size=None, lenient=false, sentinel=f64::NAN))]
pub fn ccm_matrix<'py>(
    py: Python<'py>,
    data: PyReadonlyArray2<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_size: Option<usize>,
    lenient: bool,
    sentinel: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let series = columns(&data);
    let config = CcmConfig::classic()
        .with_embedding(embedding_dim, tau)
        .with_failure_policy(policy(lenient, sentinel));
    let matrix = py.allow_threads(|| causality_matrix(&series, &config, lib_size))?;
    Ok(PyArray2::from_vec2(py, &matrix.to_vec2())?)
}

/// Copula-entropy CCM causality matrix of a (n_samples, n_series) array.
#[pyfunction]
#[pyo3(signature = (
    data, embedding_dim=2, tau=1, lib_size=None, n_samples=5, random_seed=None,
    lenient=false, sentinel=0.0
))]
#[allow(clippy::too_many_arguments)]
pub fn ce_ccm_matrix<'py>(
    py: Python<'py>,
    data: PyReadonlyArray2<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_size: Option<usize>,
    n_samples: usize,
    random_seed: Option<u64>,
    lenient: bool,
    sentinel: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let series = columns(&data);
    let config = CcmConfig {
        n_samples,
        random_seed,
        failure_policy: policy(lenient, sentinel),
        ..CcmConfig::copula_entropy().with_embedding(embedding_dim, tau)
    };
    let matrix = py.allow_threads(|| causality_matrix(&series, &config, lib_size))?;
    Ok(PyArray2::from_vec2(py, &matrix.to_vec2())?)
}
