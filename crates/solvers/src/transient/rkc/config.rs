use std::fmt;

use thiserror::Error;

/// The fewest stages for which the Chebyshev recurrence is second order.
pub const MIN_STAGES: usize = 2;

/// Where the stepper gets the spectral radius of the Jacobian from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum RadiusEstimation {
    /// Power iteration inside the stepper.
    ///
    /// A fresh estimate is reused for up to `reuse_steps` further accepted
    /// steps, across calls to `advance`. Zero estimates on every step. A
    /// rejected step always forces a new estimate.
    Internal { reuse_steps: usize },

    /// Supplied by [`OdeProblem::spectral_radius`] on every step.
    ///
    /// [`OdeProblem::spectral_radius`]: chebstep_core::OdeProblem::spectral_radius
    External,
}

impl Default for RadiusEstimation {
    fn default() -> Self {
        Self::Internal { reuse_steps: 0 }
    }
}

/// Configuration for the RKC stepper.
///
/// Fixed when the stepper is built. Use [`Config::validate`] (or
/// [`Rkc::check_correctness`]) as a pre-flight check before stepping.
///
/// [`Rkc::check_correctness`]: super::Rkc::check_correctness
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Config {
    /// Take exactly one accepted step per call to `advance`.
    pub one_step: bool,
    /// Emit per-step debug logging.
    pub verbose: bool,
    /// Enable local error control and step size adaptation.
    pub adaptive: bool,
    pub atol: f64,
    pub rtol: f64,
    pub radius: RadiusEstimation,
    pub min_stages: usize,
    pub max_stages: usize,
    /// Safety factor of the step size control law.
    pub safety: f64,
    /// Smallest allowed ratio between consecutive step sizes.
    pub shrink_min: f64,
    /// Largest allowed ratio between consecutive step sizes.
    pub grow_max: f64,
    /// Consecutive rejections tolerated within one call before giving up.
    pub max_rejections: usize,
    /// Step sizes below this are treated as a collapse.
    pub min_step: f64,
}

/// Errors reported by [`Config::validate`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("atol must be finite and positive, got {0}")]
    Atol(f64),

    #[error("rtol must be finite and positive, got {0}")]
    Rtol(f64),

    #[error("step size must be finite and positive, got {0}")]
    StepSize(f64),

    #[error("stage bounds must satisfy 2 <= min <= max, got [{min}, {max}]")]
    StageBounds { min: usize, max: usize },

    #[error("safety factor must lie in (0, 1], got {0}")]
    Safety(f64),

    #[error("step ratio bounds must satisfy 0 < shrink_min < 1 < grow_max, got [{shrink_min}, {grow_max}]")]
    StepRatio { shrink_min: f64, grow_max: f64 },

    #[error("max_rejections must be at least 1")]
    MaxRejections,

    #[error("min_step must be finite and non-negative, got {0}")]
    MinStep(f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            one_step: true,
            verbose: false,
            adaptive: false,
            atol: 1e-2,
            rtol: 1e-2,
            radius: RadiusEstimation::default(),
            min_stages: MIN_STAGES,
            max_stages: 200,
            safety: 0.8,
            shrink_min: 0.2,
            grow_max: 5.0,
            max_rejections: 20,
            min_step: 1e-12,
        }
    }
}

impl Config {
    /// Creates a config from the run flags and tolerances, with default
    /// stage bounds and step control parameters.
    #[must_use]
    pub fn new(
        one_step: bool,
        verbose: bool,
        adaptive: bool,
        atol: f64,
        rtol: f64,
        radius: RadiusEstimation,
    ) -> Self {
        Self {
            one_step,
            verbose,
            adaptive,
            atol,
            rtol,
            radius,
            ..Self::default()
        }
    }

    /// Sets both tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, atol: f64, rtol: f64) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }

    /// Enables or disables step size adaptation.
    #[must_use]
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Sets whether each call takes a single accepted step.
    #[must_use]
    pub fn with_one_step(mut self, one_step: bool) -> Self {
        self.one_step = one_step;
        self
    }

    /// Sets the spectral radius source.
    #[must_use]
    pub fn with_radius(mut self, radius: RadiusEstimation) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the allowed range of stage counts.
    #[must_use]
    pub fn with_stage_bounds(mut self, min_stages: usize, max_stages: usize) -> Self {
        self.min_stages = min_stages;
        self.max_stages = max_stages;
        self
    }

    /// Validates the configuration together with a step size.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, dt: f64) -> Result<(), ConfigError> {
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(ConfigError::Atol(self.atol));
        }
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(ConfigError::Rtol(self.rtol));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::StepSize(dt));
        }
        if self.min_stages < MIN_STAGES || self.max_stages < self.min_stages {
            return Err(ConfigError::StageBounds {
                min: self.min_stages,
                max: self.max_stages,
            });
        }
        if !(self.safety > 0.0 && self.safety <= 1.0) {
            return Err(ConfigError::Safety(self.safety));
        }
        if !(self.shrink_min > 0.0 && self.shrink_min < 1.0 && self.grow_max > 1.0)
            || !self.grow_max.is_finite()
        {
            return Err(ConfigError::StepRatio {
                shrink_min: self.shrink_min,
                grow_max: self.grow_max,
            });
        }
        if self.max_rejections == 0 {
            return Err(ConfigError::MaxRejections);
        }
        if !self.min_step.is_finite() || self.min_step < 0.0 {
            return Err(ConfigError::MinStep(self.min_step));
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RKC stabilized explicit integrator")?;
        writeln!(f, "  one step per call:  {}", yes_no(self.one_step))?;
        writeln!(f, "  adaptive step size: {}", yes_no(self.adaptive))?;
        writeln!(f, "  verbose:            {}", yes_no(self.verbose))?;
        writeln!(f, "  atol / rtol:        {:e} / {:e}", self.atol, self.rtol)?;
        match self.radius {
            RadiusEstimation::Internal { reuse_steps } => writeln!(
                f,
                "  spectral radius:    internal (reused for {reuse_steps} steps)"
            )?,
            RadiusEstimation::External => writeln!(f, "  spectral radius:    external")?,
        }
        write!(
            f,
            "  stages:             {}..={}",
            self.min_stages, self.max_stages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(1e-3), Ok(()));
    }

    #[test]
    fn rejects_non_positive_tolerances() {
        let config = Config::default().with_tolerances(0.0, 1e-3);
        assert_eq!(config.validate(1e-3), Err(ConfigError::Atol(0.0)));

        let config = Config::default().with_tolerances(1e-3, -1.0);
        assert_eq!(config.validate(1e-3), Err(ConfigError::Rtol(-1.0)));

        let config = Config::default().with_tolerances(f64::NAN, 1e-3);
        assert!(matches!(config.validate(1e-3), Err(ConfigError::Atol(_))));
    }

    #[test]
    fn rejects_non_positive_step() {
        let config = Config::default();
        assert_eq!(config.validate(0.0), Err(ConfigError::StepSize(0.0)));
        assert_eq!(config.validate(-0.1), Err(ConfigError::StepSize(-0.1)));
        assert!(config.validate(f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_inconsistent_stage_bounds() {
        let config = Config::default().with_stage_bounds(1, 10);
        assert_eq!(
            config.validate(1e-3),
            Err(ConfigError::StageBounds { min: 1, max: 10 })
        );

        let config = Config::default().with_stage_bounds(12, 10);
        assert!(config.validate(1e-3).is_err());
    }

    #[test]
    fn rejects_bad_step_control() {
        let config = Config {
            shrink_min: 1.5,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(1e-3),
            Err(ConfigError::StepRatio { .. })
        ));

        let config = Config {
            max_rejections: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(1e-3), Err(ConfigError::MaxRejections));
    }

    #[test]
    fn display_lists_flags() {
        let config = Config::new(
            true,
            false,
            true,
            1e-3,
            1e-4,
            RadiusEstimation::External,
        );
        let text = config.to_string();
        assert!(text.contains("adaptive step size: yes"));
        assert!(text.contains("external"));
    }
}
