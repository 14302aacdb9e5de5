//! Charge-sensor current across a thermally broadened transition.
//!
//! $f(x) = -i_0 \tanh((x - x_0)/\beta) + i_1 (x - x_0) + i_2$
//!
//! Parameters:
//!
//! * `x0` - Transition location
//! * `beta` - Transition width
//! * `i0` - Step amplitude
//! * `i1` - Linear background slope
//! * `i2` - Current offset

use ndarray::{Array, ArrayBase, ArrayView1, Data, Dimension};

use crate::error::{FitError, Result};
use crate::models::{window_extrema, FitMode, LineShape};
use crate::parameters::Bounds;

/// Sensor current evaluated elementwise over `x`.
pub fn i_sense<S, D>(x: &ArrayBase<S, D>, x0: f64, beta: f64, i0: f64, i1: f64, i2: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| -i0 * ((xi - x0) / beta).tanh() + i1 * (xi - x0) + i2)
}

/// The sensor-current transition as a fittable line shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ISense;

impl LineShape for ISense {
    fn roles(&self) -> &'static [&'static str] {
        &["x0", "beta", "i0", "i1", "i2"]
    }

    fn eval_point(&self, x: f64, p: &[f64]) -> f64 {
        let dx = x - p[0];
        -p[2] * (dx / p[1]).tanh() + p[3] * dx + p[4]
    }

    fn bounds(&self, x0bounds: (f64, f64), _mode: FitMode) -> Result<Vec<Bounds>> {
        Ok(vec![
            Bounds::new(x0bounds.0, x0bounds.1)?,
            Bounds::new(0.2, 10.0)?,
            Bounds::new(0.001, 10.0)?,
            Bounds::new(0.0, 10.0)?,
            Bounds::new(0.0, 20.0)?,
        ])
    }

    fn initial_guess(&self, center: f64, width: f64, z_window: ArrayView1<f64>) -> Result<Vec<f64>> {
        let (lo, hi) = window_extrema(z_window)?;
        let mean = z_window
            .mean()
            .ok_or_else(|| FitError::InvalidInput("empty fit window".to_string()))?;

        Ok(vec![center, width, (hi - lo).abs(), 0.1, mean])
    }
}
