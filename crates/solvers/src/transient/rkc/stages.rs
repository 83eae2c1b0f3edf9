//! Chebyshev parameters and stage count selection.
//!
//! The stability polynomial of an `s`-stage RKC step is
//!
//! ```text
//! P_s(z) = a_s + b_s T_s(w0 + w1 z)
//! ```
//!
//! with damping `w0 = 1 + eps / s²` and `w1 = T_s'(w0) / T_s''(w0)`. It stays
//! bounded on the negative real axis down to `w0 + w1 z = -1`, which gives the
//! closed-form stability boundary `(1 + w0) / w1 ≈ 0.653 s²`.

/// Damping parameter of the Chebyshev polynomial.
pub const DAMPING: f64 = 2.0 / 13.0;

/// Damped Chebyshev parameters for one stage count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chebyshev {
    /// Number of stages.
    pub stages: usize,
    /// Shifted argument of `T_s`.
    pub w0: f64,
    /// Scaling of `z`, `T_s'(w0) / T_s''(w0)`.
    pub w1: f64,
}

impl Chebyshev {
    /// Computes the parameters for `stages` stages.
    #[must_use]
    pub fn new(stages: usize) -> Self {
        let s = stages as f64;
        let shift = DAMPING / (s * s);
        let w0 = 1.0 + shift;

        // w0² - 1 without cancellation.
        let temp1 = shift * (2.0 + shift);
        let temp2 = temp1.sqrt();
        let arg = s * (w0 + temp2).ln();
        let w1 = arg.sinh() * temp1 / (arg.cosh() * s * temp2 - w0 * arg.sinh());

        Self { stages, w0, w1 }
    }

    /// Returns the length of the real stability interval `[-boundary, 0]`.
    #[must_use]
    pub fn stability_boundary(&self) -> f64 {
        (1.0 + self.w0) / self.w1
    }
}

/// Returns the real stability boundary of the `stages`-stage method.
#[must_use]
pub fn stability_boundary(stages: usize) -> f64 {
    Chebyshev::new(stages).stability_boundary()
}

/// The requested step cannot be stabilized within the stage budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetExceeded {
    /// `dt * rho` of the requested step.
    pub demand: f64,
    pub max_stages: usize,
    /// Stability boundary reached with `max_stages` stages.
    pub boundary: f64,
}

/// Chooses the fewest stages in `[min_stages, max_stages]` that keep
/// `dt * rho` inside the stability interval.
///
/// # Errors
///
/// Returns [`BudgetExceeded`] if even `max_stages` stages cannot stabilize
/// the step. The stage count is never clamped.
pub fn select_stages(
    rho: f64,
    dt: f64,
    min_stages: usize,
    max_stages: usize,
) -> Result<usize, BudgetExceeded> {
    let demand = dt * rho;

    // Undamped boundary is 2(s² - 1)/3, so no s below sqrt(1.5 * demand) can work.
    let lower = ((1.5 * demand).sqrt().floor() as usize).max(min_stages);

    (lower..=max_stages)
        .find(|&s| demand <= stability_boundary(s))
        .ok_or(BudgetExceeded {
            demand,
            max_stages,
            boundary: stability_boundary(max_stages),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn boundary_grows_quadratically() {
        for s in [10, 50, 100, 200] {
            let ratio = stability_boundary(s) / (s * s) as f64;
            assert!(ratio > 0.64 && ratio < 0.66, "s = {s}: ratio {ratio}");
        }
    }

    #[test]
    fn boundary_is_increasing() {
        let mut previous = 0.0;
        for s in 2..=200 {
            let boundary = stability_boundary(s);
            assert!(boundary > previous);
            previous = boundary;
        }
    }

    #[test]
    fn two_stage_scaling_equals_shift() {
        // For s = 2: T_2'(w0) / T_2''(w0) = 4 w0 / 4 = w0.
        let cheb = Chebyshev::new(2);
        assert_relative_eq!(cheb.w1, cheb.w0, max_relative = 1e-12);
    }

    #[test]
    fn selects_minimal_stage_count() {
        let dt = 0.01;
        for rho in [1.0, 120.0, 1_000.0, 5_432.1, 100_000.0] {
            let s = select_stages(rho, dt, 2, 200).unwrap();
            assert!(dt * rho <= stability_boundary(s));
            if s > 2 {
                assert!(dt * rho > stability_boundary(s - 1), "rho = {rho}: s = {s}");
            }
        }
    }

    #[test]
    fn zero_radius_uses_minimum() {
        assert_eq!(select_stages(0.0, 1.0, 3, 200).unwrap(), 3);
    }

    #[test]
    fn exceeding_budget_is_an_error() {
        let demand = 1.01 * stability_boundary(200);
        let error = select_stages(demand, 1.0, 2, 200).unwrap_err();
        assert_eq!(error.max_stages, 200);
        assert!(error.demand > error.boundary);
    }

    #[test]
    fn infinite_demand_is_an_error() {
        assert!(select_stages(f64::INFINITY, 1.0, 2, 200).is_err());
    }
}
