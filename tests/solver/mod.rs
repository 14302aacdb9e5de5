//! Tests of the least-squares substrate: solver, problem trait, parameters.

// Levenberg-Marquardt on hand-written problems
pub mod lm;

// Parameter sets, links and serialization
pub mod parameters;
