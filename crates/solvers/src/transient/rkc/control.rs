//! Local error estimation and step size control.

use super::Config;

/// Order of the RKC method.
pub const ORDER: i32 = 2;

/// Computes the weighted RMS norm of the embedded error estimate.
///
/// The estimate compares the step against a trapezoidal reconstruction from
/// the derivatives at both ends:
///
/// ```text
/// est = 0.8 (y0 - y1) + 0.4 h (f0 + f1)
/// ```
///
/// Each component is weighted by `atol + rtol * max(|y0|, |y1|)`.
#[must_use]
pub fn error_norm(
    y0: &[f64],
    y1: &[f64],
    f0: &[f64],
    f1: &[f64],
    h: f64,
    atol: f64,
    rtol: f64,
) -> f64 {
    let n = y0.len();
    if n == 0 {
        return 0.0;
    }

    let sum: f64 = y0
        .iter()
        .zip(y1)
        .zip(f0.iter().zip(f1))
        .map(|((a, b), (fa, fb))| {
            let est = 0.8 * (a - b) + 0.4 * h * (fa + fb);
            let weight = atol + rtol * a.abs().max(b.abs());
            (est / weight).powi(2)
        })
        .sum();

    (sum / n as f64).sqrt()
}

/// Outcome of one step size decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Whether the step is accepted.
    pub accept: bool,

    /// Step size for the next attempt (the retry if rejected).
    pub dt: f64,
}

/// Error-per-step controller with a bounded step ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controller {
    safety: f64,
    shrink_min: f64,
    grow_max: f64,
}

impl Controller {
    /// Creates a controller from the step control part of a config.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            safety: config.safety,
            shrink_min: config.shrink_min,
            grow_max: config.grow_max,
        }
    }

    /// Accepts the step iff `error_norm <= 1` and proposes the next step size.
    ///
    /// The new step is `dt * clamp(safety * error_norm^(-1/(p+1)), shrink_min,
    /// grow_max)`; a zero error norm grows by `grow_max`.
    #[must_use]
    pub fn control(&self, error_norm: f64, dt: f64) -> Decision {
        let factor = if error_norm > 0.0 {
            let exponent = -1.0 / f64::from(ORDER + 1);
            (self.safety * error_norm.powf(exponent)).clamp(self.shrink_min, self.grow_max)
        } else if error_norm == 0.0 {
            self.grow_max
        } else {
            self.shrink_min
        };

        Decision {
            accept: error_norm <= 1.0,
            dt: dt * factor,
        }
    }
}
