//! Options controlling a simultaneous fit.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lm::LmConfig;

/// Options for [`fit_simultaneous`](super::fit_simultaneous).
///
/// Any non-empty `constrain` or `fix` selects the joint path; otherwise each
/// dataset is fitted on its own.
///
/// # Examples
///
/// ```
/// use spinfit::fit::FitOptions;
///
/// let options = FitOptions::from_json(r#"{ "constrain": ["beta"], "span": 2.5 }"#).unwrap();
/// assert_eq!(options.constrain, vec!["beta".to_string()]);
/// assert!(options.parallel);
/// assert!(options.is_joint());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Roles tied to dataset 0's value in every dataset
    pub constrain: Vec<String>,

    /// Roles held at their initial guess in every dataset
    pub fix: Vec<String>,

    /// Half-width of the fit window around each center, in x units
    pub span: Option<f64>,

    /// Run independent fits on the rayon thread pool
    pub parallel: bool,

    /// Levenberg-Marquardt settings used for every solve
    pub solver: LmConfig,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            constrain: Vec::new(),
            fix: Vec::new(),
            span: None,
            parallel: true,
            solver: LmConfig::default(),
        }
    }
}

impl FitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_constrain<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constrain = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fix<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fix = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_span(mut self, span: f64) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_solver(mut self, solver: LmConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Whether these options call for one joint optimization
    pub fn is_joint(&self) -> bool {
        !self.constrain.is_empty() || !self.fix.is_empty()
    }
}
