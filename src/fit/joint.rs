//! One optimization over every dataset, with shared and fixed roles.

use crate::dataset::Datasets;
use crate::error::{FitError, Result};
use crate::fit::problem::WindowedProblem;
use crate::fit::{FitOptions, FitTable};
use crate::models::{FitMode, LineShape};
use crate::parameters::{Parameter, ParameterError, ParameterSet};
use crate::window::Window;

/// Position of a role name, as a typed error when the model has no such role
pub(crate) fn resolve_role<M: LineShape + ?Sized>(model: &M, name: &str) -> Result<usize> {
    model.role_index(name).ok_or_else(|| {
        FitError::Parameter(ParameterError::UnknownRole {
            name: name.to_string(),
        })
    })
}

/// Build the joint parameter set: one group per dataset with the initial
/// guess clamped into the joint bounds, then the `constrain` roles tied to
/// dataset 0 and the `fix` roles frozen.
pub(crate) fn build_parameters<M: LineShape + ?Sized>(
    model: &M,
    data: &Datasets,
    windows: &[Window],
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<ParameterSet> {
    let bounds = model.bounds(x0bounds, FitMode::Joint)?;

    let mut params = ParameterSet::new(model.n_roles());
    for (i, window) in windows.iter().enumerate() {
        let z = window.slice(data.z_row(i));
        let guess = model.initial_guess(centers[i], widths[i], z)?;

        let group = guess
            .iter()
            .zip(&bounds)
            .map(|(&value, b)| Parameter::with_bounds(value, b.min, b.max))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        params.push_group(group)?;
    }

    for name in &options.constrain {
        params.tie_role(resolve_role(model, name)?)?;
    }
    for name in &options.fix {
        params.fix_role(resolve_role(model, name)?)?;
    }

    Ok(params)
}

pub(crate) fn fit_joint<M: LineShape + ?Sized>(
    model: &M,
    data: &Datasets,
    windows: &[Window],
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<FitTable> {
    let params = build_parameters(model, data, windows, centers, widths, x0bounds, options)?;

    let segments = windows
        .iter()
        .enumerate()
        .map(|(i, window)| (window.slice(data.x_row(i)), window.slice(data.z_row(i))))
        .collect();

    let problem = WindowedProblem::new(model, segments, params)?;
    let (fitted, result) = problem.solve(&options.solver)?;
    log::debug!(
        "joint fit of {} datasets: {} free parameters, {} iterations, cost {:.3e}",
        data.len(),
        fitted.n_free(),
        result.iterations,
        result.cost
    );

    let mut table = FitTable::new(model.roles(), data.len(), FitMode::Joint);
    for i in 0..data.len() {
        let row = fitted.group_values(i).ok_or_else(|| {
            FitError::FunctionEvaluation(format!("no fitted parameters for dataset {}", i))
        })?;
        table.set_row(i, &row)?;
    }
    Ok(table)
}
