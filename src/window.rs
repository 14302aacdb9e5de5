//! Fit-window selection.
//!
//! Each dataset is fitted, and its initial guess derived, only over a window
//! of sample indices. With a half-width `span` the window runs from the sample
//! nearest `center - span` to the sample nearest `center + span`; without one
//! it covers the full row.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

/// Inclusive range of sample indices `low..=high`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub low: usize,
    pub high: usize,
}

impl Window {
    /// Create a window, putting the ends in ascending order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Window over a whole row of `n_samples`
    pub fn full(n_samples: usize) -> Self {
        Self::new(0, n_samples.saturating_sub(1))
    }

    /// Number of samples inside the window
    pub fn len(&self) -> usize {
        self.high - self.low + 1
    }

    /// Always `false`: a window holds at least the sample at `low`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Restrict a row to the window
    pub fn slice<'a>(&self, row: ArrayView1<'a, f64>) -> ArrayView1<'a, f64> {
        row.slice_move(ndarray::s![self.low..=self.high])
    }
}

/// Index of the value in `row` nearest to `target`, skipping NaN entries.
///
/// Works on unsorted and non-uniform rows. Ties go to the lowest index.
/// Returns `None` when every entry is NaN.
pub fn nearest_index(row: ArrayView1<f64>, target: f64) -> Option<usize> {
    row.iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| {
            let dist = (v - target).abs();
            match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((i, dist)),
            }
        })
        .map(|(i, _)| i)
}

/// Compute one fit window per row of `x`.
///
/// When the nearest-index lookups come back in descending order (a sweep
/// recorded from high to low x, or a center close to the edge of an unsorted
/// row) the ends are swapped, so a window is never inverted.
///
/// # Errors
///
/// * `FitError::DimensionMismatch` if `centers` does not have one entry per row
/// * `FitError::InvalidInput` if `span` is not a positive finite number, or a
///   row contains only NaN
pub fn select_windows(x: &Array2<f64>, centers: &[f64], span: Option<f64>) -> Result<Vec<Window>> {
    let (n, m) = x.dim();
    if centers.len() != n {
        return Err(FitError::DimensionMismatch(format!(
            "expected {} centers, got {}",
            n,
            centers.len()
        )));
    }

    let span = match span {
        None => return Ok(vec![Window::full(m); n]),
        Some(span) if span.is_finite() && span > 0.0 => span,
        Some(span) => {
            return Err(FitError::InvalidInput(format!(
                "span must be a positive finite number, got {}",
                span
            )))
        }
    };

    x.outer_iter()
        .zip(centers)
        .enumerate()
        .map(|(i, (row, &center))| {
            let lookup = |target: f64| {
                nearest_index(row, target).ok_or_else(|| {
                    FitError::InvalidInput(format!("x row {} contains no finite values", i))
                })
            };
            let low = lookup(center - span)?;
            let high = lookup(center + span)?;
            Ok(Window::new(low, high))
        })
        .collect()
}
