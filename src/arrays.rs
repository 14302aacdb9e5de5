//! Array helpers used to prepare scan data for fitting.
//!
//! These are small numeric utilities: derivatives, running averages, cuts of
//! 2-D scans, plotting grids and straight-line geometry.

use std::path::{Path, PathBuf};

use ndarray::{
    s, Array, Array1, Array2, ArrayBase, ArrayView1, ArrayViewD, ArrayViewMut1, Axis, Data,
    Dimension, Ix2, Zip,
};

use crate::error::{FitError, Result};
use crate::window::nearest_index;

/// Path of the measurement file numbered `dat` under `base`: `base/dat{n}.h5`
pub fn dat_file_path(dat: u32, base: impl AsRef<Path>) -> PathBuf {
    base.as_ref().join(format!("dat{}.h5", dat))
}

/// Mean spacing of consecutive x values
fn mean_spacing(x: ArrayView1<f64>) -> Result<f64> {
    if x.len() < 2 {
        return Err(FitError::InvalidInput(
            "need at least two x values to find a spacing".to_string(),
        ));
    }
    Ok((x[x.len() - 1] - x[0]) / (x.len() - 1) as f64)
}

/// Derivative `df/dx` along `axis`, assuming uniform spacing.
///
/// The spacing is the mean step of `x`. Interior points use central
/// differences, the two end points one-sided differences.
pub fn dfdx<S, D>(f: &ArrayBase<S, D>, x: ArrayView1<f64>, axis: Axis) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if axis.index() >= f.ndim() {
        return Err(FitError::DimensionMismatch(format!(
            "axis {} out of range for an array of {} dimensions",
            axis.index(),
            f.ndim()
        )));
    }
    if f.len_of(axis) < 2 {
        return Err(FitError::InvalidInput(
            "need at least two samples along the derivative axis".to_string(),
        ));
    }
    let dx = mean_spacing(x)?;

    let mut out = Array::zeros(f.raw_dim());
    Zip::from(out.lanes_mut(axis))
        .and(f.lanes(axis))
        .for_each(|mut d, lane| {
            let n = lane.len();
            d[0] = (lane[1] - lane[0]) / dx;
            d[n - 1] = (lane[n - 1] - lane[n - 2]) / dx;
            for i in 1..n - 1 {
                d[i] = (lane[i + 1] - lane[i - 1]) / (2.0 * dx);
            }
        });
    Ok(out)
}

fn running_mean_into(values: ArrayView1<f64>, avgs: usize, mut out: ArrayViewMut1<f64>) {
    let mut sum: f64 = values.iter().take(avgs).sum();
    out[0] = sum / avgs as f64;
    for k in 1..out.len() {
        sum += values[k + avgs - 1] - values[k - 1];
        out[k] = sum / avgs as f64;
    }
}

/// Running mean over `avgs` consecutive samples.
///
/// Returns the averaged `x` and `y`. With `axis = None` the flattened `y` is
/// averaged; otherwise `y` is averaged along `axis`. Outputs are `avgs - 1`
/// samples shorter than the inputs.
pub fn moving_avg<S, D>(
    x: ArrayView1<f64>,
    y: &ArrayBase<S, D>,
    avgs: usize,
    axis: Option<Axis>,
) -> Result<(Array1<f64>, Array<f64, ndarray::IxDyn>)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let y_len = match axis {
        Some(axis) if axis.index() >= y.ndim() => {
            return Err(FitError::DimensionMismatch(format!(
                "axis {} out of range for an array of {} dimensions",
                axis.index(),
                y.ndim()
            )))
        }
        Some(axis) => y.len_of(axis),
        None => y.len(),
    };
    if avgs == 0 || avgs > x.len() || avgs > y_len {
        return Err(FitError::InvalidInput(format!(
            "cannot average {} samples out of {} x and {} y values",
            avgs,
            x.len(),
            y_len
        )));
    }

    let mut x_avg = Array1::zeros(x.len() - avgs + 1);
    running_mean_into(x, avgs, x_avg.view_mut());

    let y_avg = match axis {
        None => {
            let flat: Array1<f64> = y.iter().copied().collect();
            let mut out = Array1::zeros(flat.len() - avgs + 1);
            running_mean_into(flat.view(), avgs, out.view_mut());
            out.into_dyn()
        }
        Some(axis) => {
            let y = y.view().into_dyn();
            let mut shape = y.shape().to_vec();
            shape[axis.index()] = y_len - avgs + 1;
            let mut out = Array::zeros(shape);
            Zip::from(out.lanes_mut(axis))
                .and(y.lanes(axis))
                .for_each(|o, lane| running_mean_into(lane, avgs, o));
            out
        }
    };

    Ok((x_avg, y_avg))
}

/// Cut of a 2-D scan between coordinate bounds `[x_low, x_high, y_low,
/// y_high]`. A `None` bound falls back to the first or last coordinate.
///
/// `z` is indexed `[y, x]`. Each bound selects the nearest sample; the cut
/// includes both ends.
///
/// # Errors
///
/// * `FitError::NotImplemented` for 1-D `z`
/// * `FitError::Shape` if `z` is not 2-D or does not match `x` and `y`
pub fn get_subset(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    z: ArrayViewD<f64>,
    bounds: [Option<f64>; 4],
) -> Result<(Array1<f64>, Array1<f64>, Array2<f64>)> {
    let z = match z.ndim() {
        1 => {
            return Err(FitError::NotImplemented(
                "subsets of 1-D data".to_string(),
            ))
        }
        2 => z
            .into_dimensionality::<Ix2>()
            .map_err(|e| FitError::Shape(e.to_string()))?,
        ndim => {
            return Err(FitError::Shape(format!(
                "z must have 2 dimensions, got {}",
                ndim
            )))
        }
    };
    if z.dim() != (y.len(), x.len()) {
        return Err(FitError::Shape(format!(
            "z has shape {:?}, expected ({}, {})",
            z.dim(),
            y.len(),
            x.len()
        )));
    }
    if x.is_empty() || y.is_empty() {
        return Err(FitError::Shape("cannot cut an empty scan".to_string()));
    }

    let extent = [x[0], x[x.len() - 1], y[0], y[y.len() - 1]];
    let bound = |i: usize| bounds[i].unwrap_or(extent[i]);
    let lookup = |row: ArrayView1<f64>, target: f64| {
        nearest_index(row, target)
            .ok_or_else(|| FitError::InvalidInput("coordinates contain no finite values".to_string()))
    };

    let (ix0, ix1) = ordered(lookup(x, bound(0))?, lookup(x, bound(1))?);
    let (iy0, iy1) = ordered(lookup(y, bound(2))?, lookup(y, bound(3))?);

    Ok((
        x.slice(s![ix0..=ix1]).to_owned(),
        y.slice(s![iy0..=iy1]).to_owned(),
        z.slice(s![iy0..=iy1, ix0..=ix1]).to_owned(),
    ))
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Grid of cell edges for plotting `z` values centered on `(x, y)`.
///
/// Every coordinate is shifted back by half a step and one more edge is
/// appended, so the grids are one larger than `x` and `y` in each direction.
/// Returns `(X, Y)` of shape `(y.len() + 1, x.len() + 1)`.
pub fn xy_to_meshgrid(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
    let edges = |v: ArrayView1<f64>| -> Result<Array1<f64>> {
        let dv = mean_spacing(v)?;
        let mut e = Array1::zeros(v.len() + 1);
        e.slice_mut(s![..v.len()]).assign(&v.mapv(|vi| vi - dv / 2.0));
        e[v.len()] = v[v.len() - 1] + dv / 2.0;
        Ok(e)
    };
    let xe = edges(x)?;
    let ye = edges(y)?;

    let shape = (ye.len(), xe.len());
    let xx = Array2::from_shape_fn(shape, |(_, j)| xe[j]);
    let yy = Array2::from_shape_fn(shape, |(i, _)| ye[i]);
    Ok((xx, yy))
}

/// x coordinate where lines `(slope, intercept)` cross. `None` if parallel.
pub fn x_intersection(line0: (f64, f64), line1: (f64, f64)) -> Option<f64> {
    let dm = line1.0 - line0.0;
    (dm != 0.0).then(|| (line0.1 - line1.1) / dm)
}

/// y coordinate where lines `(slope, intercept)` cross. `None` if parallel.
pub fn y_intersection(line0: (f64, f64), line1: (f64, f64)) -> Option<f64> {
    x_intersection(line0, line1).map(|x| line0.0 * x + line0.1)
}

/// Smallest distance from `point` to the vertices of the polyline `(x, y)`
pub fn dist_to_line(x: ArrayView1<f64>, y: ArrayView1<f64>, point: (f64, f64)) -> Option<f64> {
    x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - point.0).hypot(yi - point.1))
        .filter(|d| !d.is_nan())
        .reduce(f64::min)
}

/// Whether any vertex of `(x, y)` lies closer than `delta` to `point`
pub fn is_near_line(x: ArrayView1<f64>, y: ArrayView1<f64>, point: (f64, f64), delta: f64) -> bool {
    dist_to_line(x, y, point).map_or(false, |d| d < delta)
}
