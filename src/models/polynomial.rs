//! Polynomial background shapes.
//!
//! Coefficients are given highest power first, matching how the fitted
//! backgrounds are usually reported.

use ndarray::{Array, ArrayBase, Data, Dimension};

/// `a*x + b`
pub fn line<S, D>(x: &ArrayBase<S, D>, a: f64, b: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| a * xi + b)
}

/// `a*x^2 + b*x + c`
pub fn parabola<S, D>(x: &ArrayBase<S, D>, a: f64, b: f64, c: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| (a * xi + b) * xi + c)
}

/// `a*x^3 + b*x^2 + c*x + d`
pub fn cubic<S, D>(x: &ArrayBase<S, D>, a: f64, b: f64, c: f64, d: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| ((a * xi + b) * xi + c) * xi + d)
}

/// `a*x^4 + b*x^3 + c*x^2 + d*x + e`
pub fn quartic<S, D>(x: &ArrayBase<S, D>, a: f64, b: f64, c: f64, d: f64, e: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| (((a * xi + b) * xi + c) * xi + d) * xi + e)
}
