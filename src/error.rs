//! Error types for cross-map causality.
//!
//! Input problems (short series, mismatched lengths, oversized libraries) are
//! reported eagerly. Degenerate correlations and negative entropy estimates are
//! not errors: they surface as `NaN` and `0.0` scores respectively.

/// Primary error type for the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CcmError {
    /// The series cannot produce a single delay vector.
    #[error(
        "series of length {len} is too short for embedding dimension {dimension} and delay {delay}"
    )]
    InsufficientLength {
        /// Length of the offending series.
        len: usize,
        /// Requested embedding dimension E.
        dimension: usize,
        /// Requested delay tau.
        delay: usize,
    },

    /// Two series that must be aligned have different lengths.
    #[error("series lengths differ: cause has {cause} samples, effect has {effect}")]
    LengthMismatch {
        /// Length of the cause (or first) series.
        cause: usize,
        /// Length of the effect (or offending) series.
        effect: usize,
    },

    /// The library cannot support the requested cross-map.
    #[error("invalid library size {requested} ({available} embedding vectors available)")]
    InvalidLibrarySize {
        /// Requested library size.
        requested: usize,
        /// Vectors available in the embedding.
        available: usize,
    },

    /// A configuration value is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The invalid value, rendered.
        value: String,
        /// Description of the valid range.
        expected: &'static str,
    },

    /// The entropy estimator was called outside its contract.
    #[error("entropy estimator: {0}")]
    Estimator(String),

    /// A matrix build was stopped through its cancel token.
    #[error("causality matrix build cancelled after {completed} of {total} pairs")]
    Cancelled {
        /// Pairs finished before the stop was observed.
        completed: usize,
        /// Pairs scheduled.
        total: usize,
    },
}

impl CcmError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> Self {
        CcmError::InvalidParameter {
            name,
            value: value.to_string(),
            expected,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CcmError>;

#[cfg(feature = "python")]
impl From<CcmError> for pyo3::PyErr {
    fn from(err: CcmError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
