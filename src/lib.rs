//! # spinfit
//!
//! `spinfit` fits parametric line shapes to spin-entropy charge-sensor
//! measurements, one dataset at a time or many datasets at once with shared
//! parameters.
//!
//! The library provides:
//! - Line-shape models: the sensor-current transition [`models::i_sense`],
//!   the weak-localization peak [`models::di_sense_simple`] and polynomial
//!   backgrounds
//! - Fit-window selection around per-dataset center estimates
//! - A parameter system with bounds, fixed values and linked parameters
//! - Joint fits with parameters tied across datasets, and parallel
//!   independent fits, both driven by a Levenberg-Marquardt solver
//! - Array helpers for preparing scan data
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::{Array1, Array2};
//! use spinfit::{di_fit_simultaneous, FitOptions};
//! use spinfit::models::di_sense_simple;
//!
//! let x = Array1::linspace(-10.0, 10.0, 201);
//! let mut z = Array2::<f64>::zeros((2, 201));
//! for (i, x0) in [0.0, 1.0].iter().enumerate() {
//!     z.row_mut(i).assign(&di_sense_simple(&x, *x0, 1.5, 0.1, 0.002, 0.0));
//! }
//!
//! // Hold the asymmetry at its initial guess of zero
//! let options = FitOptions::new().with_fix(["delta"]);
//! let table = di_fit_simultaneous(&x, &z, &[0.0, 1.0], &[1.0, 1.0], (-3.0, 3.0), &options).unwrap();
//!
//! assert_eq!(table.column("delta").unwrap().to_vec(), vec![0.0, 0.0]);
//! assert!((table.get(1, "beta").unwrap() - 1.5).abs() < 1e-5);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Solver
pub mod lm;
pub mod problem;

// Models and data
pub mod arrays;
pub mod dataset;
pub mod models;
pub mod window;

// Simultaneous fitting
pub mod fit;

mod utils;

// Re-exports for convenience
pub use error::{FitError, Result};
pub use fit::{
    curve_fit, di_fit_simultaneous, fit_simultaneous, i_sense_fit_simultaneous, FitOptions,
    FitTable,
};
pub use lm::LevenbergMarquardt;
pub use models::{DiSenseSimple, FitMode, ISense, LineShape};
pub use problem::Problem;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
