//! Internal helpers for the solver.

pub mod finite_difference;
