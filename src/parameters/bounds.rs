//! Parameter bounds implementation
//!
//! Box bounds for fit parameters together with the Minuit-style transform used
//! to hand bounded parameters to an unconstrained optimizer, as lmfit does.

use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },

    #[error("Non-finite parameter value is not allowed")]
    NonFiniteValue,
}

/// Lower and upper limit on a parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum allowed value for the parameter
    pub min: f64,

    /// Maximum allowed value for the parameter
    pub max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        // JSON has no infinity, so open ends are written as null
        let mut state = serializer.serialize_struct("Bounds", 2)?;
        state.serialize_field("min", &self.min.is_finite().then_some(self.min))?;
        state.serialize_field("max", &self.max.is_finite().then_some(self.max))?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;
        let min = helper.min.unwrap_or(NEG_INFINITY);
        let max = helper.max.unwrap_or(INFINITY);

        Bounds::new(min, max).map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Create new bounds, rejecting `min > max` and NaN limits
    ///
    /// # Examples
    ///
    /// ```
    /// use spinfit::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.2, 10.0).unwrap();
    /// assert_eq!(bounds.min, 0.2);
    /// assert!(Bounds::new(1.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Bounds from negative infinity to positive infinity
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Clamp a value into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Minuit-style mapping between bounded external values and unbounded
/// internal values seen by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Map an internal optimizer value to an external value inside the bounds
    pub fn to_external(&self, internal_value: f64) -> f64 {
        let b = &self.bounds;
        match (b.has_lower_bound(), b.has_upper_bound()) {
            (false, false) => internal_value,
            (true, false) => b.min - 1.0 + (internal_value * internal_value + 1.0).sqrt(),
            (false, true) => b.max + 1.0 - (internal_value * internal_value + 1.0).sqrt(),
            (true, true) => b.min + (internal_value.sin() + 1.0) * (b.max - b.min) / 2.0,
        }
    }

    /// Map an external value to the internal optimizer coordinate
    pub fn to_internal(&self, external_value: f64) -> Result<f64, BoundsError> {
        if !external_value.is_finite() {
            return Err(BoundsError::NonFiniteValue);
        }

        let b = &self.bounds;
        if !b.is_within_bounds(external_value) {
            return Err(BoundsError::ValueOutsideBounds {
                value: external_value,
                min: b.min,
                max: b.max,
            });
        }

        let internal = match (b.has_lower_bound(), b.has_upper_bound()) {
            (false, false) => external_value,
            (true, false) => ((external_value - b.min + 1.0).powi(2) - 1.0).sqrt(),
            (false, true) => ((b.max - external_value + 1.0).powi(2) - 1.0).sqrt(),
            (true, true) => {
                let range = b.max - b.min;
                if range == 0.0 {
                    0.0
                } else {
                    (2.0 * (external_value - b.min) / range - 1.0)
                        .clamp(-1.0, 1.0)
                        .asin()
                }
            }
        };

        Ok(internal)
    }
}
