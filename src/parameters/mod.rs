//! # Parameter System
//!
//! Named, bounded fit parameters organised as one group per dataset.
//!
//! - [`Parameter`]: a value with bounds, a "varies" flag and an optional link
//! - [`ParameterSet`]: all groups of a simultaneous fit, addressed by [`ParamKey`]
//! - [`Bounds`] and [`BoundsTransform`]: box bounds and the Minuit-style
//!   mapping used to optimize bounded parameters without constraints
//!
//! ## Example Usage
//!
//! ```rust
//! use spinfit::parameters::{ParamKey, Parameter, ParameterSet};
//!
//! // Two datasets, each with (x0, beta)
//! let mut params = ParameterSet::new(2);
//! for center in [0.0, 0.3] {
//!     params
//!         .push_group(vec![
//!             Parameter::with_bounds(center, -2.0, 2.0).unwrap(),
//!             Parameter::with_bounds(1.0, 0.2, 10.0).unwrap(),
//!         ])
//!         .unwrap();
//! }
//!
//! // Share beta between the datasets
//! params.tie_role(1).unwrap();
//! assert_eq!(params.n_free(), 3);
//! assert_eq!(params.get(ParamKey::new(1, 1)).unwrap().link(), Some(ParamKey::new(1, 0)));
//! ```

pub mod bounds;
pub mod parameter;
pub mod parameters;

pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use parameter::{ParamKey, Parameter, ParameterError};
pub use parameters::ParameterSet;
