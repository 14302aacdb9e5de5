//! Simultaneous fitting of a line shape to many datasets.
//!
//! [`fit_simultaneous`] validates the inputs, selects a fit window per
//! dataset, and then takes one of two paths:
//!
//! - **joint**, when any role is constrained or fixed: one parameter group per
//!   dataset, constrained roles linked to dataset 0, fixed roles frozen, and a
//!   single Levenberg-Marquardt solve over the concatenated residuals
//! - **independent** otherwise: one bounded fit per dataset, run in parallel
//!
//! Either way the result is a [`FitTable`] with one row per dataset in input
//! order.
//!
//! ```
//! use ndarray::{Array1, Array2};
//! use spinfit::fit::{i_sense_fit_simultaneous, FitOptions};
//! use spinfit::models::i_sense;
//!
//! let x = Array1::linspace(-5.0, 5.0, 100);
//! let mut z = Array2::<f64>::zeros((3, 100));
//! for i in 0..3 {
//!     z.row_mut(i).assign(&i_sense(&x, 0.3 * i as f64, 1.0, 2.0, 0.05, 1.0));
//! }
//!
//! let options = FitOptions::new().with_constrain(["beta", "i1"]);
//! let table = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
//!     .unwrap();
//!
//! assert_eq!(table.len(), 3);
//! assert!((table.get(2, "x0").unwrap() - 0.6).abs() < 1e-5);
//! ```

use ndarray::{ArrayBase, Data, Dimension};

use crate::dataset::Datasets;
use crate::error::{FitError, Result};
use crate::models::{DiSenseSimple, ISense, LineShape};
use crate::window::select_windows;

mod independent;
mod joint;
mod options;
mod problem;
mod table;

pub use independent::curve_fit;
pub use options::FitOptions;
pub use problem::{Segment, WindowedProblem};
pub use table::FitTable;

/// Fit `model` to every row of `z`.
///
/// `x` is either shared by all datasets (1-D, or one row) or given per
/// dataset. `centers` and `widths` seed the location and width roles and
/// position the fit windows; `x0bounds` bounds the location role.
///
/// # Errors
///
/// Input problems are reported before any optimizer runs:
///
/// * `FitError::Shape` for a `z` that is not 1-D or 2-D, or an `x` whose row
///   or sample count does not match `z`
/// * `FitError::DimensionMismatch` if `centers` or `widths` do not have one
///   entry per dataset
/// * `FitError::InvalidInput` for a bad span, a window with fewer samples
///   than the model has roles, or `fix` on a model that does not support it
/// * `FitError::Parameter` for unknown role names or invalid `x0bounds`
///
/// Solver failures (`InfeasibleGuess`, `ConvergenceFailure`) are passed on
/// unchanged; no retry is attempted.
pub fn fit_simultaneous<M, S1, D1, S2, D2>(
    model: &M,
    x: &ArrayBase<S1, D1>,
    z: &ArrayBase<S2, D2>,
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<FitTable>
where
    M: LineShape + ?Sized,
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    let data = Datasets::from_dyn(x.view().into_dyn(), z.view().into_dyn())?;
    let n = data.len();

    if widths.len() != n {
        return Err(FitError::DimensionMismatch(format!(
            "expected {} widths, got {}",
            n,
            widths.len()
        )));
    }
    if !options.fix.is_empty() && !model.supports_fix() {
        return Err(FitError::InvalidInput(format!(
            "this model does not support fixed roles (got {:?})",
            options.fix
        )));
    }
    for name in options.constrain.iter().chain(&options.fix) {
        joint::resolve_role(model, name)?;
    }
    model.bounds(x0bounds, crate::models::FitMode::Joint)?;

    let windows = select_windows(data.x(), centers, options.span)?;
    if let Some((i, window)) = windows
        .iter()
        .enumerate()
        .find(|(_, w)| w.len() < model.n_roles())
    {
        return Err(FitError::InvalidInput(format!(
            "fit window of dataset {} holds {} samples, fewer than the {} roles to fit",
            i,
            window.len(),
            model.n_roles()
        )));
    }

    if options.is_joint() {
        log::debug!(
            "joint fit of {} datasets, constrain {:?}, fix {:?}",
            n,
            options.constrain,
            options.fix
        );
        joint::fit_joint(model, &data, &windows, centers, widths, x0bounds, options)
    } else {
        log::debug!(
            "independent fits of {} datasets (parallel: {})",
            n,
            options.parallel
        );
        independent::fit_independent(model, &data, &windows, centers, widths, x0bounds, options)
    }
}

/// [`fit_simultaneous`] with the sensor-current transition.
///
/// Columns: `x0, beta, i0, i1, i2`. `options.fix` must be empty.
pub fn i_sense_fit_simultaneous<S1, D1, S2, D2>(
    x: &ArrayBase<S1, D1>,
    z: &ArrayBase<S2, D2>,
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<FitTable>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    fit_simultaneous(&ISense, x, z, centers, widths, x0bounds, options)
}

/// [`fit_simultaneous`] with the weak-localization peak.
///
/// Columns: `x0, beta, di0, di2, delta`.
pub fn di_fit_simultaneous<S1, D1, S2, D2>(
    x: &ArrayBase<S1, D1>,
    z: &ArrayBase<S2, D2>,
    centers: &[f64],
    widths: &[f64],
    x0bounds: (f64, f64),
    options: &FitOptions,
) -> Result<FitTable>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    fit_simultaneous(&DiSenseSimple, x, z, centers, widths, x0bounds, options)
}
