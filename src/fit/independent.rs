//! Per-dataset fits with no shared parameters.

use ndarray::ArrayView1;
use rayon::prelude::*;

use crate::dataset::Datasets;
use crate::error::{FitError, Result};
use crate::fit::problem::WindowedProblem;
use crate::fit::{FitOptions, FitTable};
use crate::lm::LmConfig;
use crate::models::{FitMode, LineShape};
use crate::parameters::{Bounds, Parameter, ParameterSet};
use crate::window::Window;

/// Fit `model` to a single curve under box bounds.
///
/// Returns the fitted values in role order.
///
/// # Errors
///
/// * `FitError::DimensionMismatch` if `x` and `y`, or `p0`, `bounds` and the
///   model's roles, differ in length
/// * `FitError::InfeasibleGuess` if any entry of `p0` is outside its bounds
/// * `FitError::ConvergenceFailure` if the solver gives up
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use spinfit::fit::curve_fit;
/// use spinfit::lm::LmConfig;
/// use spinfit::models::{i_sense, FitMode, ISense, LineShape};
///
/// let x = Array1::linspace(-5.0, 5.0, 80);
/// let y = i_sense(&x, 0.4, 1.2, 2.0, 0.05, 1.0);
///
/// let bounds = ISense.bounds((-2.0, 2.0), FitMode::Independent).unwrap();
/// let p0 = [0.0, 1.0, 3.0, 0.1, 1.0];
/// let fitted = curve_fit(&ISense, x.view(), y.view(), &p0, &bounds, &LmConfig::default()).unwrap();
/// assert!((fitted[0] - 0.4).abs() < 1e-5);
/// ```
pub fn curve_fit<'a, M: LineShape + ?Sized>(
    model: &'a M,
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    p0: &[f64],
    bounds: &[Bounds],
    config: &LmConfig,
) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(FitError::DimensionMismatch(format!(
            "x has {} values, y has {}",
            x.len(),
            y.len()
        )));
    }
    if p0.len() != model.n_roles() || bounds.len() != model.n_roles() {
        return Err(FitError::DimensionMismatch(format!(
            "expected {} initial values and bounds, got {} and {}",
            model.n_roles(),
            p0.len(),
            bounds.len()
        )));
    }

    let mut group = Vec::with_capacity(p0.len());
    for ((&value, b), role) in p0.iter().zip(bounds).zip(model.roles()) {
        if !value.is_finite() || !b.is_within_bounds(value) {
            return Err(FitError::InfeasibleGuess(format!(
                "{} = {} is outside [{}, {}]",
                role, value, b.min, b.max
            )));
        }
        group.push(Parameter::with_bounds(value, b.min, b.max)?);
    }

    let mut params = ParameterSet::new(model.n_roles());
    params.push_group(group)?;

    let problem = WindowedProblem::new(model, vec![(x, y)], params)?;
    let (fitted, _) = problem.solve(config)?;

    fitted
        .group_values(0)
        .ok_or_else(|| FitError::FunctionEvaluation("fit returned no parameters".to_string()))
}

/// Fit every dataset on its own and collect the results.
///
/// Each fit reads only its own rows, so with `options.parallel` they run on
/// the rayon pool. The first failing dataset aborts the whole call.
pub(crate) fn fit_independent<M: LineShape + ?Sized>(
    model: &M,
    data: &Datasets,
    windows: &[Window],
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<FitTable> {
    let bounds = model.bounds(x0bounds, FitMode::Independent)?;

    let fit_one = |i: usize| -> Result<Vec<f64>> {
        let window = windows[i];
        let x = window.slice(data.x_row(i));
        let z = window.slice(data.z_row(i));
        let p0 = model.initial_guess(centers[i], widths[i], z)?;

        curve_fit(model, x, z, &p0, &bounds, &options.solver).map_err(|err| {
            log::debug!("independent fit of dataset {} failed: {}", i, err);
            err
        })
    };

    let rows: Vec<Vec<f64>> = if options.parallel {
        (0..data.len()).into_par_iter().map(fit_one).collect::<Result<_>>()?
    } else {
        (0..data.len()).map(fit_one).collect::<Result<_>>()?
    };

    let mut table = FitTable::new(model.roles(), data.len(), FitMode::Independent);
    for (i, row) in rows.iter().enumerate() {
        table.set_row(i, row)?;
    }
    Ok(table)
}
