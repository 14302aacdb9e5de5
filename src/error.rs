use thiserror::Error;

use crate::parameters::{BoundsError, ParameterError};

/// Error types for the spinfit library.
#[derive(Error, Debug)]
pub enum FitError {
    /// Input arrays have the wrong dimensionality or row count.
    #[error("Shape error: {0}")]
    Shape(String),

    /// Error indicating a mismatch in vector or matrix dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid input data or options.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Initial guess lies outside the box bounds of an independent fit.
    #[error("Initial guess is infeasible: {0}")]
    InfeasibleGuess(String),

    /// Error indicating the algorithm failed to converge.
    #[error("Algorithm failed to converge: {0}")]
    ConvergenceFailure(String),

    /// Error indicating a singular matrix was encountered.
    #[error("Singular matrix encountered")]
    SingularMatrix,

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Not implemented functionality.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Error raised by the parameter system.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BoundsError> for FitError {
    fn from(err: BoundsError) -> Self {
        FitError::Parameter(ParameterError::from(err))
    }
}

/// Result type alias for spinfit operations.
pub type Result<T> = std::result::Result<T, FitError>;
