//! Validated collections of measurement rows.
//!
//! A [`Datasets`] pairs an `n × m` array of measured values `z` with an
//! `n × m` array of independent-variable values `x`. The inputs may arrive in
//! looser shapes: a 1-D `z` is one dataset, and a 1-D or single-row `x` is
//! shared by every dataset.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewD, Axis, Ix1, Ix2};

use crate::error::{FitError, Result};

/// Measurement rows and their matching x coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    x: Array2<f64>,
    z: Array2<f64>,
}

impl Datasets {
    /// Build from arrays of any dimensionality, validating their shapes.
    ///
    /// # Errors
    ///
    /// * `FitError::Shape` if `z` is not 1-D or 2-D, if `x` has a row count
    ///   other than 1 or the number of datasets, or if the sample counts differ
    pub fn from_dyn(x: ArrayViewD<f64>, z: ArrayViewD<f64>) -> Result<Self> {
        let z = match z.ndim() {
            1 => z
                .into_dimensionality::<Ix1>()
                .map_err(|e| FitError::Shape(e.to_string()))?
                .insert_axis(Axis(0)),
            2 => z
                .into_dimensionality::<Ix2>()
                .map_err(|e| FitError::Shape(e.to_string()))?,
            ndim => {
                return Err(FitError::Shape(format!(
                    "z must have 1 or 2 dimensions, got {}",
                    ndim
                )))
            }
        };

        let x = match x.ndim() {
            1 => x
                .into_dimensionality::<Ix1>()
                .map_err(|e| FitError::Shape(e.to_string()))?
                .insert_axis(Axis(0)),
            2 => x
                .into_dimensionality::<Ix2>()
                .map_err(|e| FitError::Shape(e.to_string()))?,
            ndim => {
                return Err(FitError::Shape(format!(
                    "x must have 1 or 2 dimensions, got {}",
                    ndim
                )))
            }
        };

        Self::new(x, z)
    }

    /// Build from 2-D views, broadcasting a single-row `x` across all datasets.
    pub fn new(x: ArrayView2<f64>, z: ArrayView2<f64>) -> Result<Self> {
        let (n, m) = z.dim();
        if n == 0 || m == 0 {
            return Err(FitError::Shape(format!(
                "z must hold at least one sample, got shape ({}, {})",
                n, m
            )));
        }

        if x.ncols() != m {
            return Err(FitError::Shape(format!(
                "x has {} samples per row but z has {}",
                x.ncols(),
                m
            )));
        }

        let x = match x.nrows() {
            1 => x
                .broadcast((n, m))
                .ok_or_else(|| FitError::Shape("cannot broadcast x over z".to_string()))?
                .to_owned(),
            rows if rows == n => x.to_owned(),
            rows => {
                return Err(FitError::Shape(format!(
                    "x must have 1 or {} rows, got {}",
                    n, rows
                )))
            }
        };

        Ok(Self { x, z: z.to_owned() })
    }

    /// Number of datasets (rows of `z`)
    pub fn len(&self) -> usize {
        self.z.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.z.nrows() == 0
    }

    /// Samples per dataset
    pub fn n_samples(&self) -> usize {
        self.z.ncols()
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn z(&self) -> &Array2<f64> {
        &self.z
    }

    /// x coordinates of dataset `i`
    pub fn x_row(&self, i: usize) -> ArrayView1<f64> {
        self.x.row(i)
    }

    /// Measured values of dataset `i`
    pub fn z_row(&self, i: usize) -> ArrayView1<f64> {
        self.z.row(i)
    }
}
