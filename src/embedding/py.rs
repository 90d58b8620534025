use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::delay::{self, DelayMethod, DimensionMethod};

/// Time-delay embedding.
/// Returns ((n_points, dimension) manifold, aligned target).
#[pyfunction]
#[pyo3(signature = (signal, dimension=3, delay=1))]
pub fn time_delay_embedding<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    dimension: usize,
    delay: usize,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray1<f64>>)> {
    let emb = delay::embed(signal.as_slice()?, dimension, delay)?;
    Ok((
        PyArray2::from_vec2(py, &emb.points)?,
        PyArray1::from_vec(py, emb.targets),
    ))
}

/// Delay at the first zero of the autocorrelation or first minimum of AMI.
#[pyfunction]
#[pyo3(signature = (signal, max_lag=None, method="mutual_info"))]
pub fn optimal_delay(
    signal: PyReadonlyArray1<f64>,
    max_lag: Option<usize>,
    method: &str,
) -> PyResult<usize> {
    let method = match method {
        "autocorrelation" => DelayMethod::Autocorrelation,
        _ => DelayMethod::MutualInformation,
    };
    Ok(delay::optimal_delay(signal.as_slice()?, max_lag, method))
}

/// Embedding dimension via FNN or Cao's method.
#[pyfunction]
#[pyo3(signature = (signal, delay=None, max_dim=10, method="fnn", threshold=0.01))]
pub fn optimal_dimension(
    signal: PyReadonlyArray1<f64>,
    delay: Option<usize>,
    max_dim: usize,
    method: &str,
    threshold: f64,
) -> PyResult<usize> {
    let method = match method {
        "cao" => DimensionMethod::Cao,
        "fnn" => DimensionMethod::FalseNearestNeighbors,
        other => return Err(PyValueError::new_err(format!("unknown method: {other}"))),
    };
    Ok(delay::optimal_dimension(
        signal.as_slice()?,
        delay.unwrap_or(1),
        max_dim,
        method,
        threshold,
    )?)
}
