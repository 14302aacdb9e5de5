//! Finite difference methods for numerical differentiation.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::problem::Problem;

/// Default relative step size for finite differences.
pub const DEFAULT_EPSILON: f64 = 1.490_116_119_384_765_6e-8; // sqrt(f64::EPSILON)

/// Compute the Jacobian matrix using forward finite differences.
///
/// J[i,j] = ∂residual[i]/∂param[j], with the step for parameter `j` scaled to
/// its magnitude (and `epsilon` itself for parameters near zero).
///
/// `residuals` are the residuals already known at `params`; when given, the
/// problem is evaluated exactly once per parameter.
pub fn jacobian<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    residuals: Option<&Array1<f64>>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let n_params = params.len();
    let n_residuals = problem.residual_count();

    let evaluated;
    let residuals = match residuals {
        Some(known) => known,
        None => {
            evaluated = problem.eval(params)?;
            &evaluated
        }
    };
    if residuals.len() != n_residuals {
        return Err(FitError::DimensionMismatch(format!(
            "Expected {} residuals, got {}",
            n_residuals,
            residuals.len()
        )));
    }

    let mut jac = Array2::zeros((n_residuals, n_params));
    let mut perturbed = params.clone();

    for j in 0..n_params {
        let eps_j = eps * params[j].abs().max(1.0);
        perturbed[j] = params[j] + eps_j;

        let residuals_perturbed = problem.eval(&perturbed)?;
        perturbed[j] = params[j];

        jac.column_mut(j)
            .assign(&((&residuals_perturbed - residuals) / eps_j));
    }

    Ok(jac)
}
