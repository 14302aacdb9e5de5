//! Windowed least-squares problem over one or more datasets.
//!
//! This module adapts a [`ParameterSet`] and a [`LineShape`] to the
//! [`Problem`] trait. The optimizer only sees the free parameters in their
//! internal coordinates; linked and fixed parameters are filled in from the
//! set before the model is evaluated.

use ndarray::{Array1, ArrayView1};

use crate::error::{FitError, Result};
use crate::lm::{LevenbergMarquardt, LmConfig, LmResult};
use crate::models::LineShape;
use crate::parameters::ParameterSet;
use crate::problem::Problem;

/// x and z values of one dataset, already restricted to its fit window
pub type Segment<'a> = (ArrayView1<'a, f64>, ArrayView1<'a, f64>);

/// Residuals `z - model(x)` of every dataset, concatenated in dataset order
pub struct WindowedProblem<'a, M: LineShape + ?Sized> {
    model: &'a M,
    segments: Vec<Segment<'a>>,
    params: ParameterSet,
    n_residuals: usize,
}

impl<'a, M: LineShape + ?Sized> WindowedProblem<'a, M> {
    /// Pair one segment with each parameter group of `params`.
    pub fn new(model: &'a M, segments: Vec<Segment<'a>>, params: ParameterSet) -> Result<Self> {
        if params.n_roles() != model.n_roles() {
            return Err(FitError::DimensionMismatch(format!(
                "model has {} roles, parameter groups have {}",
                model.n_roles(),
                params.n_roles()
            )));
        }
        if segments.len() != params.n_datasets() {
            return Err(FitError::DimensionMismatch(format!(
                "{} segments for {} parameter groups",
                segments.len(),
                params.n_datasets()
            )));
        }
        if let Some(i) = segments.iter().position(|(x, z)| x.len() != z.len()) {
            return Err(FitError::DimensionMismatch(format!(
                "segment {} has {} x values and {} z values",
                i,
                segments[i].0.len(),
                segments[i].1.len()
            )));
        }

        let n_residuals = segments.iter().map(|(_, z)| z.len()).sum();
        Ok(Self {
            model,
            segments,
            params,
            n_residuals,
        })
    }

    /// The parameter set at its starting values
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// A copy of the parameter set with the free parameters taken from
    /// optimizer coordinates
    pub fn apply(&self, internal: &[f64]) -> Result<ParameterSet> {
        let mut params = self.params.clone();
        params.update_from_internal(internal)?;
        Ok(params)
    }

    /// Minimize the problem from the set's starting values.
    ///
    /// A solver that stops without meeting a convergence criterion is an
    /// error here; the caller gets the message rather than a half-fitted set.
    pub fn solve(&self, config: &LmConfig) -> Result<(ParameterSet, LmResult)> {
        let initial = self.params.to_internal()?;
        let result = LevenbergMarquardt::with_config(config.clone()).minimize(self, initial)?;

        if !result.success {
            log::warn!(
                "fit did not converge after {} iterations: {}",
                result.iterations,
                result.message
            );
            return Err(FitError::ConvergenceFailure(result.message));
        }

        let params = self.apply(&result.params.to_vec())?;
        Ok((params, result))
    }
}

impl<'a, M: LineShape + ?Sized> Problem for WindowedProblem<'a, M> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let set = self.apply(&params.to_vec())?;

        let mut residuals = Vec::with_capacity(self.n_residuals);
        for (i, (x, z)) in self.segments.iter().enumerate() {
            let values = set.group_values(i).ok_or_else(|| {
                FitError::FunctionEvaluation(format!("no parameter group for dataset {}", i))
            })?;
            residuals.extend(
                x.iter()
                    .zip(z.iter())
                    .map(|(&xi, &zi)| zi - self.model.eval_point(xi, &values)),
            );
        }

        Ok(Array1::from_vec(residuals))
    }

    fn parameter_count(&self) -> usize {
        self.params.n_free()
    }

    fn residual_count(&self) -> usize {
        self.n_residuals
    }
}
