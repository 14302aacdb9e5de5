//! Implementation of the Levenberg-Marquardt algorithm.
//!
//! Each iteration solves the damped normal equations `(JᵀJ + λI) δ = -Jᵀr`
//! with a Cholesky factorisation. Steps that lower the cost are accepted and
//! relax the damping; rejected steps raise it, shrinking the next step toward
//! gradient descent.

use ndarray::{Array1, Array2};
use std::fmt;

use crate::error::{FitError, Result};
use crate::problem::Problem;

use super::config::LmConfig;

/// Result of the Levenberg-Marquardt optimization.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Optimized parameter values
    pub params: Array1<f64>,

    /// Residuals at the solution
    pub residuals: Array1<f64>,

    /// Sum of squared residuals
    pub cost: f64,

    /// Number of accepted steps
    pub iterations: usize,

    /// Number of residual evaluations, including those spent on the Jacobian
    pub func_evals: usize,

    /// Whether a convergence criterion was met
    pub success: bool,

    /// A message describing the result
    pub message: String,
}

impl fmt::Display for LmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    config: LmConfig,
}

/// Search state carried between iterations
struct State {
    params: Array1<f64>,
    residuals: Array1<f64>,
    cost: f64,
    iterations: usize,
    func_evals: usize,
}

impl State {
    fn finish(self, success: bool, message: String) -> LmResult {
        LmResult {
            params: self.params,
            residuals: self.residuals,
            cost: self.cost,
            iterations: self.iterations,
            func_evals: self.func_evals,
            success,
            message,
        }
    }
}

fn sum_of_squares(v: &Array1<f64>) -> f64 {
    v.dot(v)
}

impl LevenbergMarquardt {
    /// Create a new Levenberg-Marquardt optimizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Levenberg-Marquardt optimizer with the given configuration.
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LmConfig {
        &self.config
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance for relative cost decrease.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.config.ftol = ftol;
        self
    }

    /// Set the tolerance for relative step size.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.config.xtol = xtol;
        self
    }

    /// Set the tolerance for gradient norm.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.config.gtol = gtol;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Minimize the sum of squared residuals for the given problem.
    ///
    /// Returns `Ok` with `success == false` when the iteration or damping
    /// limit is reached; callers decide whether that is an error. Errors are
    /// reserved for malformed problems (wrong sizes, non-finite residuals at
    /// the starting point).
    pub fn minimize<P: Problem>(&self, problem: &P, initial_params: Array1<f64>) -> Result<LmResult> {
        let n_params = problem.parameter_count();
        if initial_params.len() != n_params {
            return Err(FitError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                initial_params.len()
            )));
        }

        let residuals = problem.eval(&initial_params)?;
        if residuals.len() != problem.residual_count() {
            return Err(FitError::DimensionMismatch(format!(
                "Expected {} residuals, got {}",
                problem.residual_count(),
                residuals.len()
            )));
        }
        if residuals.iter().any(|r| !r.is_finite()) {
            return Err(FitError::FunctionEvaluation(
                "Residuals are not finite at the initial parameters".to_string(),
            ));
        }

        let mut state = State {
            cost: sum_of_squares(&residuals),
            params: initial_params,
            residuals,
            iterations: 0,
            func_evals: 1,
        };

        if n_params == 0 {
            return Ok(state.finish(true, "No free parameters".to_string()));
        }

        let cfg = &self.config;
        let mut lambda = cfg.initial_lambda;

        loop {
            if state.cost == 0.0 {
                return Ok(state.finish(true, "Residuals vanish".to_string()));
            }
            if state.iterations >= cfg.max_iterations {
                let message = format!("Maximum iterations ({}) reached", cfg.max_iterations);
                return Ok(state.finish(false, message));
            }

            let jac = problem.jacobian(&state.params, &state.residuals, cfg.fd_epsilon)?;
            state.func_evals += n_params;

            let gradient = jac.t().dot(&state.residuals);
            let jtj = jac.t().dot(&jac);

            let gradient_norm = gradient.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
            if gradient_norm <= cfg.gtol {
                let message = format!(
                    "Gradient convergence: ||g|| = {:.2e} <= {:.2e}",
                    gradient_norm, cfg.gtol
                );
                return Ok(state.finish(true, message));
            }

            // Raise the damping until a step lowers the cost
            loop {
                let step = match solve_damped(&jtj, &gradient, lambda) {
                    Some(step) => step,
                    None => {
                        lambda *= cfg.lambda_up_factor;
                        if lambda > cfg.max_lambda {
                            return Ok(state.finish(
                                false,
                                "Damped system stayed singular up to maximum lambda".to_string(),
                            ));
                        }
                        continue;
                    }
                };

                let step_norm = sum_of_squares(&step).sqrt();
                let params_norm = sum_of_squares(&state.params).sqrt();
                let step_small = step_norm <= cfg.xtol * (params_norm + cfg.xtol);

                let trial = &state.params + &step;
                let trial_residuals = problem.eval(&trial)?;
                state.func_evals += 1;
                let trial_cost = sum_of_squares(&trial_residuals);

                if trial_cost.is_finite() && trial_cost < state.cost {
                    let relative_decrease = (state.cost - trial_cost) / state.cost;

                    state.params = trial;
                    state.residuals = trial_residuals;
                    state.cost = trial_cost;
                    state.iterations += 1;
                    lambda = (lambda * cfg.lambda_down_factor).max(cfg.min_lambda);

                    log::trace!(
                        "lm iteration {}: cost = {:.6e}, lambda = {:.1e}",
                        state.iterations,
                        state.cost,
                        lambda
                    );

                    if step_small {
                        let message = format!("Parameter convergence: |dx| <= {:.2e} |x|", cfg.xtol);
                        return Ok(state.finish(true, message));
                    }
                    if relative_decrease <= cfg.ftol {
                        let message = format!(
                            "Cost convergence: |df|/f = {:.2e} <= {:.2e}",
                            relative_decrease, cfg.ftol
                        );
                        return Ok(state.finish(true, message));
                    }
                    break;
                }

                if step_small {
                    let message = format!("Parameter convergence: |dx| <= {:.2e} |x|", cfg.xtol);
                    return Ok(state.finish(true, message));
                }

                lambda *= cfg.lambda_up_factor;
                if lambda > cfg.max_lambda {
                    return Ok(state.finish(
                        false,
                        "Failed to decrease cost, and lambda reached maximum".to_string(),
                    ));
                }
            }
        }
    }
}

/// Solve `(JᵀJ + λI) δ = -g` by Cholesky factorisation.
///
/// Returns `None` if the damped matrix is not positive definite.
fn solve_damped(jtj: &Array2<f64>, gradient: &Array1<f64>, lambda: f64) -> Option<Array1<f64>> {
    let n = jtj.nrows();
    let mut a = jtj.clone();
    for i in 0..n {
        a[[i, i]] += lambda;
    }

    // In-place lower Cholesky factor
    for k in 0..n {
        for j in 0..k {
            a[[k, k]] -= a[[k, j]] * a[[k, j]];
        }
        if !(a[[k, k]] > 0.0) {
            return None;
        }
        let akk = a[[k, k]].sqrt();
        a[[k, k]] = akk;

        for i in k + 1..n {
            for j in 0..k {
                a[[i, k]] -= a[[i, j]] * a[[k, j]];
            }
            a[[i, k]] /= akk;
        }
    }

    // Forward substitution (L * y = -g)
    let mut y = gradient.mapv(|g| -g);
    for i in 0..n {
        for j in 0..i {
            y[i] -= a[[i, j]] * y[j];
        }
        y[i] /= a[[i, i]];
    }

    // Backward substitution (L^T * x = y)
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        x[i] = y[i];
        for j in (i + 1)..n {
            x[i] -= a[[j, i]] * x[j];
        }
        x[i] /= a[[i, i]];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
