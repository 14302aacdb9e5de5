//! Parameter definition and implementation
//!
//! A [`Parameter`] is one scalar of a line-shape model for one dataset. It
//! either owns its value, in which case the optimizer may vary it, or it is
//! linked to another parameter and simply mirrors that value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameters::bounds::{Bounds, BoundsError, BoundsTransform};

/// Address of a parameter inside a [`ParameterSet`](super::ParameterSet):
/// which model role it plays, and for which dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamKey {
    /// Index into the model's role tuple
    pub role: usize,

    /// Dataset (row of `z`) the parameter belongs to
    pub dataset: usize,
}

impl ParamKey {
    pub fn new(role: usize, dataset: usize) -> Self {
        Self { role, dataset }
    }
}

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    #[error("Parameter {key:?} not found")]
    ParameterNotFound { key: ParamKey },

    #[error("Unknown parameter role '{name}'")]
    UnknownRole { name: String },

    #[error("Parameter {key:?} cannot be linked to itself")]
    SelfLink { key: ParamKey },

    #[error("Parameter {key:?} cannot link to {target:?}, which is itself linked")]
    ChainedLink { key: ParamKey, target: ParamKey },

    #[error("Expected {expected} internal values, got {actual}")]
    InternalLength { expected: usize, actual: usize },
}

/// A single fit parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    value: f64,
    init_value: f64,
    bounds: Bounds,
    vary: bool,
    link: Option<ParamKey>,
}

impl Parameter {
    /// Create a free, unbounded parameter
    pub fn new(value: f64) -> Self {
        Self {
            value,
            init_value: value,
            bounds: Bounds::default(),
            vary: true,
            link: None,
        }
    }

    /// Create a free parameter with bounds. A value outside the bounds is
    /// clamped onto the nearest edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use spinfit::parameters::Parameter;
    ///
    /// let param = Parameter::with_bounds(12.0, 0.2, 10.0).unwrap();
    /// assert_eq!(param.value(), 10.0);
    /// assert!(param.vary());
    /// ```
    pub fn with_bounds(value: f64, min: f64, max: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(min, max)?;
        if value.is_nan() {
            return Err(BoundsError::NonFiniteValue.into());
        }
        let value = bounds.clamp(value);

        Ok(Self {
            value,
            init_value: value,
            bounds,
            vary: true,
            link: None,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value at construction time (after clamping)
    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    /// Set the value, rejecting anything outside the bounds
    pub fn set_value(&mut self, value: f64) -> Result<(), ParameterError> {
        if !self.bounds.is_within_bounds(value) {
            return Err(BoundsError::ValueOutsideBounds {
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            }
            .into());
        }

        self.value = value;
        Ok(())
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn min(&self) -> f64 {
        self.bounds.min
    }

    pub fn max(&self) -> f64 {
        self.bounds.max
    }

    /// Whether the value is held fixed by the user
    pub fn vary(&self) -> bool {
        self.vary
    }

    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    /// The parameter this one mirrors, if any
    pub fn link(&self) -> Option<ParamKey> {
        self.link
    }

    pub(crate) fn set_link(&mut self, target: Option<ParamKey>) {
        self.link = target;
    }

    /// Whether the optimizer owns this parameter as a free variable
    pub fn is_free(&self) -> bool {
        self.vary && self.link.is_none()
    }

    /// Value in the optimizer's unbounded coordinate
    pub fn to_internal(&self) -> Result<f64, ParameterError> {
        BoundsTransform::new(self.bounds)
            .to_internal(self.value)
            .map_err(ParameterError::from)
    }

    /// Set the value from the optimizer's unbounded coordinate
    pub fn set_from_internal(&mut self, internal_value: f64) {
        self.value = BoundsTransform::new(self.bounds).to_external(internal_value);
    }

    /// Copy a value verbatim, bypassing bounds. Used to mirror a link target.
    pub(crate) fn mirror(&mut self, value: f64) {
        self.value = value;
    }
}
