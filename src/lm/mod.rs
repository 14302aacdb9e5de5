//! Levenberg-Marquardt algorithm implementation.
//!
//! This module provides the bounded-by-transform least-squares solver shared by
//! the joint and the independent fitting paths.

pub mod algorithm;
pub mod config;

pub use algorithm::{LevenbergMarquardt, LmResult};
pub use config::LmConfig;
