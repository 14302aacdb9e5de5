//! Weak-localization derivative peak.
//!
//! $f(x) = -\tfrac{1}{2}\, di_0\, (a + \delta)\, \mathrm{sech}^2(a) + di_2$, with $a = (x - x_0)/\beta$

use ndarray::{Array, ArrayBase, ArrayView1, Data, Dimension};

use crate::error::Result;
use crate::models::{window_extrema, FitMode, LineShape};
use crate::parameters::Bounds;

fn peak(x: f64, x0: f64, beta: f64, di0: f64, di2: f64, delta: f64) -> f64 {
    let arg = (x - x0) / beta;
    let sech = 1.0 / arg.cosh();
    -0.5 * di0 * (arg + delta) * sech * sech + di2
}

/// Weak-localization peak evaluated elementwise over `x`.
pub fn di_sense_simple<S, D>(
    x: &ArrayBase<S, D>,
    x0: f64,
    beta: f64,
    di0: f64,
    di2: f64,
    delta: f64,
) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| peak(xi, x0, beta, di0, di2, delta))
}

/// The weak-localization peak as a fittable line shape.
///
/// Unlike [`ISense`](super::ISense), roles of this model may be held fixed in
/// a joint fit, and the offset `di2` gets a tighter box there than in
/// independent fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiSenseSimple;

impl LineShape for DiSenseSimple {
    fn roles(&self) -> &'static [&'static str] {
        &["x0", "beta", "di0", "di2", "delta"]
    }

    fn eval_point(&self, x: f64, p: &[f64]) -> f64 {
        peak(x, p[0], p[1], p[2], p[3], p[4])
    }

    fn bounds(&self, x0bounds: (f64, f64), mode: FitMode) -> Result<Vec<Bounds>> {
        let di2 = match mode {
            FitMode::Joint => Bounds::new(-0.01, 0.01)?,
            FitMode::Independent => Bounds::new(-0.05, 0.05)?,
        };

        Ok(vec![
            Bounds::new(x0bounds.0, x0bounds.1)?,
            Bounds::new(0.2, 10.0)?,
            Bounds::new(0.0, 0.5)?,
            di2,
            Bounds::new(-2.0, 2.0)?,
        ])
    }

    fn initial_guess(&self, center: f64, width: f64, z_window: ArrayView1<f64>) -> Result<Vec<f64>> {
        let (lo, hi) = window_extrema(z_window)?;
        let amplitude = lo.abs().max(hi.abs());
        // Offset from the window edges, where the peak has decayed
        let offset = (z_window[0] + z_window[z_window.len() - 1]) / 2.0;

        Ok(vec![center, width, amplitude, offset, 0.0])
    }

    fn supports_fix(&self) -> bool {
        true
    }
}
