//! Problem definition trait.
//!
//! This module defines the `Problem` trait, which represents a nonlinear
//! least squares problem to be solved with the Levenberg-Marquardt algorithm.

use ndarray::{Array1, Array2};

use crate::error::Result;

/// A nonlinear least squares problem.
///
/// The optimizer only sees a flat parameter vector and the residual vector it
/// produces; how parameters map onto a model is up to the implementation.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the Jacobian matrix at the given parameters.
    ///
    /// `residuals` are the residuals at `params`. The default implementation
    /// uses forward finite differences with step `epsilon` relative to each
    /// parameter's magnitude, costing one evaluation per parameter.
    fn jacobian(
        &self,
        params: &Array1<f64>,
        residuals: &Array1<f64>,
        epsilon: f64,
    ) -> Result<Array2<f64>>
    where
        Self: Sized,
    {
        crate::utils::finite_difference::jacobian(self, params, Some(residuals), Some(epsilon))
    }

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}
