//! Line-shape models for charge-sensor measurements.
//!
//! Each model is available both as a plain function over arrays (for plotting
//! and synthetic data) and as a [`LineShape`] implementation that the
//! simultaneous fitter drives: role names, per-role bounds and a
//! data-derived initial guess.

use ndarray::{Array1, ArrayView1};

use crate::error::{FitError, Result};
use crate::parameters::Bounds;

mod polynomial;
mod sensor;
mod weak_localization;

pub use polynomial::{cubic, line, parabola, quartic};
pub use sensor::{i_sense, ISense};
pub use weak_localization::{di_sense_simple, DiSenseSimple};

/// Which fitting path a set of bounds or guesses is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FitMode {
    /// One optimization over every dataset, with shared or fixed roles
    Joint,
    /// One optimization per dataset
    Independent,
}

/// A parametric line shape with a fixed tuple of named roles.
pub trait LineShape: Send + Sync {
    /// Role names in parameter (and output column) order.
    fn roles(&self) -> &'static [&'static str];

    /// Evaluate the model at a single point. `params` follows [`roles`](Self::roles).
    fn eval_point(&self, x: f64, params: &[f64]) -> f64;

    /// Box bounds for every role. `x0bounds` applies to the location role.
    fn bounds(&self, x0bounds: (f64, f64), mode: FitMode) -> Result<Vec<Bounds>>;

    /// Initial guess from the caller's center and width estimates and the
    /// measured values inside the fit window.
    fn initial_guess(&self, center: f64, width: f64, z_window: ArrayView1<f64>) -> Result<Vec<f64>>;

    /// Whether roles of this model may be held fixed in a joint fit.
    fn supports_fix(&self) -> bool {
        false
    }

    /// Evaluate the model over an array of points.
    fn eval(&self, x: ArrayView1<f64>, params: &[f64]) -> Array1<f64> {
        x.mapv(|xi| self.eval_point(xi, params))
    }

    /// Number of roles.
    fn n_roles(&self) -> usize {
        self.roles().len()
    }

    /// Position of a role name in the role tuple.
    fn role_index(&self, name: &str) -> Option<usize> {
        self.roles().iter().position(|role| *role == name)
    }
}

/// Smallest and largest finite value of a window, failing on an empty window
pub(crate) fn window_extrema(z: ArrayView1<f64>) -> Result<(f64, f64)> {
    if z.is_empty() {
        return Err(FitError::InvalidInput(
            "cannot derive an initial guess from an empty window".to_string(),
        ));
    }

    Ok(z.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    }))
}
