//! Integration tests for the Levenberg-Marquardt solver.

use std::cell::Cell;

use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};
use spinfit::lm::{LevenbergMarquardt, LmConfig};
use spinfit::{FitError, Problem, Result};

/// Exponential decay: y = a * exp(-k * t) + c
struct ExponentialDecay {
    t: Array1<f64>,
    y: Array1<f64>,
}

impl ExponentialDecay {
    fn generate(a: f64, k: f64, c: f64) -> Self {
        let t = Array1::linspace(0.0, 5.0, 60);
        let y = t.mapv(|ti| a * (-k * ti).exp() + c);
        Self { t, y }
    }
}

impl Problem for ExponentialDecay {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let (a, k, c) = (params[0], params[1], params[2]);
        Ok(self
            .t
            .iter()
            .zip(self.y.iter())
            .map(|(&ti, &yi)| a * (-k * ti).exp() + c - yi)
            .collect())
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn residual_count(&self) -> usize {
        self.t.len()
    }
}

/// Linear model with an analytic Jacobian
struct Line {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Problem for Line {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(self.x.mapv(|xi| params[0] * xi + params[1]) - &self.y)
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn residual_count(&self) -> usize {
        self.x.len()
    }

    fn jacobian(
        &self,
        _params: &Array1<f64>,
        _residuals: &Array1<f64>,
        _epsilon: f64,
    ) -> Result<Array2<f64>> {
        let mut jac = Array2::ones((self.x.len(), 2));
        jac.column_mut(0).assign(&self.x);
        Ok(jac)
    }
}

#[test]
fn test_exponential_decay() {
    let problem = ExponentialDecay::generate(2.5, 1.3, 0.4);
    let result = LevenbergMarquardt::new()
        .minimize(&problem, array![1.0, 1.0, 0.0])
        .unwrap();

    assert!(result.success, "{}", result.message);
    assert_relative_eq!(result.params[0], 2.5, epsilon = 1e-6);
    assert_relative_eq!(result.params[1], 1.3, epsilon = 1e-6);
    assert_relative_eq!(result.params[2], 0.4, epsilon = 1e-6);
    assert!(result.cost < 1e-12);
}

/// Counts every residual evaluation the solver asks for
struct CountedDecay {
    inner: ExponentialDecay,
    evals: Cell<usize>,
}

impl Problem for CountedDecay {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        self.evals.set(self.evals.get() + 1);
        self.inner.eval(params)
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn residual_count(&self) -> usize {
        self.inner.t.len()
    }
}

#[test]
fn test_func_evals_counts_every_evaluation() {
    let problem = CountedDecay {
        inner: ExponentialDecay::generate(2.5, 1.3, 0.4),
        evals: Cell::new(0),
    };
    let result = LevenbergMarquardt::new()
        .minimize(&problem, array![1.0, 1.0, 0.0])
        .unwrap();

    assert!(result.success, "{}", result.message);
    assert_eq!(result.func_evals, problem.evals.get());
}

#[test]
fn test_analytic_jacobian_is_used() {
    let x = Array1::linspace(0.0, 10.0, 11);
    let y = x.mapv(|xi| 3.0 * xi - 2.0);
    let problem = Line { x, y };

    let result = LevenbergMarquardt::new()
        .minimize(&problem, array![0.0, 0.0])
        .unwrap();
    assert_relative_eq!(result.params[0], 3.0, epsilon = 1e-8);
    assert_relative_eq!(result.params[1], -2.0, epsilon = 1e-8);
}

#[test]
fn test_config_from_json() {
    let config: LmConfig = serde_json::from_str(r#"{ "max_iterations": 2, "ftol": 1e-20 }"#).unwrap();
    assert_eq!(config.max_iterations, 2);
    assert_eq!(config.xtol, LmConfig::default().xtol);

    let problem = ExponentialDecay::generate(2.5, 1.3, 0.4);
    let result = LevenbergMarquardt::with_config(config)
        .with_xtol(0.0)
        .with_gtol(0.0)
        .minimize(&problem, array![10.0, 0.1, -3.0])
        .unwrap();
    assert!(!result.success);
    assert!(result.iterations <= 2);
}

#[test]
fn test_wrong_parameter_count() {
    let problem = ExponentialDecay::generate(1.0, 1.0, 0.0);
    let err = LevenbergMarquardt::new()
        .minimize(&problem, array![1.0])
        .unwrap_err();
    assert!(matches!(err, FitError::DimensionMismatch(_)));
}
