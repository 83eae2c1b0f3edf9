//! Spectral radius estimation by nonlinear power iteration.
//!
//! The Jacobian is never formed. Each iteration applies it to a direction `v`
//! through a finite difference of the right-hand side,
//!
//! ```text
//! J (v - y) ≈ f(t, v) - f(t, y)      with ‖v - y‖ small,
//! ```
//!
//! and rescales the result back to the same perturbation size.

use chebstep_core::OdeProblem;

/// Iteration cap of the power iteration.
pub const MAX_ITERATIONS: usize = 50;

/// Inflation applied to the converged estimate.
pub const SAFETY: f64 = 1.2;

/// Relative change between iterations that counts as converged.
const RELATIVE_TOL: f64 = 0.01;

/// Result of a spectral radius estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Inflated spectral radius, safe to use for stage selection.
    pub rho: f64,

    /// Whether the iteration met its tolerance before the cap.
    pub converged: bool,

    /// Right-hand side evaluations spent.
    pub iterations: usize,

    /// Last perturbation direction, usable as a warm start.
    pub direction: Vec<f64>,
}

/// Estimates the spectral radius of the Jacobian of `problem` at `(t, y)`.
///
/// `fy` must hold `f(t, y)`. The iteration starts from `warm_start` when it
/// has the right length (typically the direction of a previous estimate), and
/// from `fy` otherwise. Hitting [`MAX_ITERATIONS`] is not an error: the last
/// estimate is returned with `converged = false`.
///
/// # Errors
///
/// Returns the problem's error if a right-hand side evaluation fails.
pub fn estimate<P: OdeProblem>(
    problem: &P,
    t: f64,
    y: &[f64],
    fy: &[f64],
    warm_start: Option<&[f64]>,
) -> Result<Estimate, P::Error> {
    let n = y.len();
    if n == 0 {
        return Ok(Estimate {
            rho: 0.0,
            converged: true,
            iterations: 0,
            direction: Vec::new(),
        });
    }

    let start = warm_start.filter(|d| d.len() == n).unwrap_or(fy);
    let (mut v, perturbation) = initial_point(y, start);

    let mut fv = vec![0.0; n];
    let mut sigma = 0.0;

    for iteration in 1..=MAX_ITERATIONS {
        problem.derivative(t, &v, &mut fv)?;

        let diff_norm = fv
            .iter()
            .zip(fy)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();

        let previous = sigma;
        sigma = diff_norm / perturbation;

        let converged = iteration >= 2
            && (sigma - previous).abs() <= RELATIVE_TOL * sigma.max(f64::MIN_POSITIVE);
        if converged || !sigma.is_finite() {
            return Ok(Estimate {
                rho: SAFETY * sigma,
                converged,
                iterations: iteration,
                direction: difference(&v, y),
            });
        }

        if diff_norm > 0.0 {
            let scale = perturbation / diff_norm;
            for ((vi, yi), (fvi, fyi)) in v.iter_mut().zip(y).zip(fv.iter().zip(fy)) {
                *vi = yi + (fvi - fyi) * scale;
            }
        } else {
            // Flip one component so the next direction differs.
            let i = iteration % n;
            v[i] = y[i] - (v[i] - y[i]);
        }
    }

    Ok(Estimate {
        rho: SAFETY * sigma,
        converged: false,
        iterations: MAX_ITERATIONS,
        direction: difference(&v, y),
    })
}

/// Builds the first perturbed point and the perturbation size.
fn initial_point(y: &[f64], start: &[f64]) -> (Vec<f64>, f64) {
    let eps = f64::EPSILON;
    let y_norm = norm(y);
    let start_norm = norm(start);

    if y_norm > 0.0 && start_norm > 0.0 {
        let perturbation = y_norm * eps.sqrt();
        let scale = perturbation / start_norm;
        let v = y.iter().zip(start).map(|(yi, si)| yi + si * scale).collect();
        (v, perturbation)
    } else if y_norm > 0.0 {
        let perturbation = y_norm * eps.sqrt();
        let v = y.iter().map(|yi| yi * (1.0 + eps.sqrt())).collect();
        (v, perturbation)
    } else if start_norm > 0.0 {
        let scale = eps / start_norm;
        let v = start.iter().map(|si| si * scale).collect();
        (v, eps)
    } else {
        let entry = eps / (y.len() as f64).sqrt();
        (vec![entry; y.len()], eps)
    }
}

fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(ai, bi)| ai - bi).collect()
}

/// Euclidean norm.
pub(crate) fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// Diagonal linear system `y_i' = -k_i y_i`.
    struct Diagonal {
        rates: Vec<f64>,
    }

    impl OdeProblem for Diagonal {
        type Error = Infallible;

        fn derivative(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
            for ((d, v), k) in dydt.iter_mut().zip(y).zip(&self.rates) {
                *d = -k * v;
            }
            Ok(())
        }

        fn initial_condition(&self) -> Vec<f64> {
            vec![1.0; self.rates.len()]
        }
    }

    /// Linear map `[[0, a], [b, 0]]`. With `|a| != |b|` the power iteration
    /// alternates between the two off-diagonal magnitudes and never settles.
    struct Swap {
        a: f64,
        b: f64,
    }

    impl OdeProblem for Swap {
        type Error = Infallible;

        fn derivative(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
            dydt[0] = self.a * y[1];
            dydt[1] = self.b * y[0];
            Ok(())
        }

        fn initial_condition(&self) -> Vec<f64> {
            vec![1.0, 0.0]
        }
    }

    fn derivative_at<P: OdeProblem>(problem: &P, y: &[f64]) -> Vec<f64> {
        let mut fy = vec![0.0; y.len()];
        problem.derivative(0.0, y, &mut fy).unwrap();
        fy
    }

    #[test]
    fn scalar_linear_problem_is_exact() {
        let problem = Diagonal { rates: vec![250.0] };
        let y = [0.7];
        let fy = derivative_at(&problem, &y);

        let estimate = estimate(&problem, 0.0, &y, &fy, None).unwrap();

        assert!(estimate.converged);
        assert_relative_eq!(estimate.rho, SAFETY * 250.0, max_relative = 1e-6);
    }

    #[test]
    fn finds_dominant_rate() {
        let problem = Diagonal {
            rates: vec![1.0, 10.0, 400.0, 3.0],
        };
        let y = [1.0, -2.0, 0.5, 4.0];
        let fy = derivative_at(&problem, &y);

        let estimate = estimate(&problem, 0.0, &y, &fy, None).unwrap();

        assert!(estimate.converged);
        assert!(estimate.rho >= 400.0, "rho = {}", estimate.rho);
        assert!(estimate.rho <= SAFETY * 400.0 * 1.01, "rho = {}", estimate.rho);
    }

    #[test]
    fn warm_start_converges_quickly() {
        let problem = Diagonal {
            rates: vec![1.0, 10.0, 400.0],
        };
        let y = [1.0, 1.0, 1.0];
        let fy = derivative_at(&problem, &y);

        let cold = estimate(&problem, 0.0, &y, &fy, None).unwrap();
        let warm = estimate(&problem, 0.0, &y, &fy, Some(&cold.direction)).unwrap();

        assert!(warm.iterations <= cold.iterations);
        assert_relative_eq!(warm.rho, cold.rho, max_relative = 0.02);
    }

    #[test]
    fn zero_jacobian_gives_zero_radius() {
        let problem = Diagonal {
            rates: vec![0.0, 0.0],
        };
        let y = [0.0, 0.0];
        let fy = derivative_at(&problem, &y);

        let estimate = estimate(&problem, 0.0, &y, &fy, None).unwrap();

        assert!(estimate.converged);
        assert_eq!(estimate.rho, 0.0);
    }

    #[test]
    fn empty_state_is_trivial() {
        let problem = Diagonal { rates: vec![] };
        let estimate = estimate(&problem, 0.0, &[], &[], None).unwrap();
        assert_eq!(estimate.iterations, 0);
        assert_eq!(estimate.rho, 0.0);
    }

    #[test]
    fn oscillating_ratio_stops_at_iteration_cap() {
        let problem = Swap { a: 1.0, b: 10.0 };
        let y = [1.0, 0.0];
        let fy = derivative_at(&problem, &y);

        let estimate = estimate(&problem, 0.0, &y, &fy, None).unwrap();

        assert!(!estimate.converged);
        assert_eq!(estimate.iterations, MAX_ITERATIONS);
        assert!(estimate.rho.is_finite());
        assert!(estimate.rho >= SAFETY * 1.0 * 0.99, "rho = {}", estimate.rho);
        assert!(estimate.rho <= SAFETY * 10.0 * 1.01, "rho = {}", estimate.rho);
    }
}
