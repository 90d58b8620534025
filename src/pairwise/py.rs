use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::causality::CausalityEngine;
use crate::config::{CcmConfig, LibraryStrategy, Metric, Scoring};

fn scoring_from(name: &str) -> PyResult<Scoring> {
    match name {
        "pearson" => Ok(Scoring::Pearson),
        "copula_entropy" | "ce" => Ok(Scoring::CopulaEntropy),
        other => Err(pyo3::exceptions::PyValueError::new_err(format!(
            "unknown scoring: {other}"
        ))),
    }
}

/// Classic CCM: Pearson skill of predicting `x` from the manifold of `y`.
/// Tests whether x drives y.
#[pyfunction]
#[pyo3(signature = (x, y, embedding_dim=3, tau=1, lib_size=None))]
pub fn ccm(
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_size: Option<usize>,
) -> PyResult<f64> {
    let engine = CausalityEngine::new(CcmConfig::classic().with_embedding(embedding_dim, tau))?;
    Ok(engine.causality(x.as_slice()?, y.as_slice()?, lib_size)?)
}

/// Copula-entropy CCM: mean mutual-information skill over bootstrap libraries.
#[pyfunction]
#[pyo3(signature = (
    x, y, embedding_dim=2, tau=1, lib_size=None, lib_sizes=None, n_samples=5,
    replace=false, random_seed=None, k=5, metric="chebyshev"
))]
#[allow(clippy::too_many_arguments)]
pub fn ce_ccm(
    py: Python<'_>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_size: Option<usize>,
    lib_sizes: Option<Vec<usize>>,
    n_samples: usize,
    replace: bool,
    random_seed: Option<u64>,
    k: usize,
    metric: &str,
) -> PyResult<f64> {
    let config = CcmConfig {
        lib_sizes,
        n_samples,
        replace,
        random_seed,
        k,
        metric: metric.parse::<Metric>()?,
        ..CcmConfig::copula_entropy().with_embedding(embedding_dim, tau)
    };
    let engine = CausalityEngine::new(config)?;
    let (x, y) = (x.as_slice()?.to_vec(), y.as_slice()?.to_vec());
    Ok(py.allow_threads(|| engine.causality(&x, &y, lib_size))?)
}

/// Full-library predictions of `x` from the manifold of `y`.
/// Returns (predicted, observed, rho).
#[pyfunction]
#[pyo3(signature = (x, y, embedding_dim=3, tau=1, lib_size=None))]
pub fn cross_map<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_size: Option<usize>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, f64)> {
    let engine = CausalityEngine::new(CcmConfig::classic().with_embedding(embedding_dim, tau))?;
    let result = engine.cross_map(x.as_slice()?, y.as_slice()?, lib_size)?;
    Ok((
        PyArray1::from_vec(py, result.predicted),
        PyArray1::from_vec(py, result.observed),
        result.skill,
    ))
}

/// Permutation test. Returns (observed skill, one-sided p-value).
#[pyfunction]
#[pyo3(signature = (x, y, embedding_dim=3, tau=1, num_perm=100, random_seed=None, scoring="pearson"))]
#[allow(clippy::too_many_arguments)]
pub fn permutation_test(
    py: Python<'_>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    embedding_dim: usize,
    tau: usize,
    num_perm: usize,
    random_seed: Option<u64>,
    scoring: &str,
) -> PyResult<(f64, f64)> {
    let base = match scoring_from(scoring)? {
        Scoring::Pearson => CcmConfig::classic(),
        Scoring::CopulaEntropy => CcmConfig::copula_entropy(),
    };
    let config = CcmConfig {
        random_seed,
        ..base.with_embedding(embedding_dim, tau)
    };
    let (x, y) = (x.as_slice()?.to_vec(), y.as_slice()?.to_vec());
    Ok(py.allow_threads(|| super::permutation_significance(&x, &y, &config, num_perm))?)
}

/// Skill against library size.
/// Returns (library_sizes, mean_skill, std_skill).
#[pyfunction]
#[pyo3(signature = (
    x, y, embedding_dim=3, tau=1, lib_sizes=None, n_samples=5, replace=false,
    random_seed=None, scoring="pearson"
))]
#[allow(clippy::too_many_arguments)]
pub fn ccm_convergence<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    embedding_dim: usize,
    tau: usize,
    lib_sizes: Option<Vec<usize>>,
    n_samples: usize,
    replace: bool,
    random_seed: Option<u64>,
    scoring: &str,
) -> PyResult<(
    Bound<'py, PyArray1<usize>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
)> {
    let config = CcmConfig {
        lib_sizes,
        n_samples,
        replace,
        random_seed,
        scoring: scoring_from(scoring)?,
        strategy: LibraryStrategy::Bootstrap,
        ..CcmConfig::classic().with_embedding(embedding_dim, tau)
    };
    let engine = CausalityEngine::new(config)?;
    let (x, y) = (x.as_slice()?.to_vec(), y.as_slice()?.to_vec());
    let curve = py.allow_threads(|| {
        let mut rng = engine.rng();
        engine.convergence(&x, &y, &mut rng)
    })?;

    Ok((
        PyArray1::from_vec(py, curve.iter().map(|p| p.library_size).collect()),
        PyArray1::from_vec(py, curve.iter().map(|p| p.mean_skill).collect()),
        PyArray1::from_vec(py, curve.iter().map(|p| p.std_skill).collect()),
    ))
}
