use std::convert::Infallible;

use chebstep_core::OdeProblem;

use crate::kinetics::Gate;

/// Relaxation of one gating variable towards its voltage-dependent steady
/// state, with the membrane potential frozen over the step.
#[derive(Debug, Clone, Copy)]
pub struct GateProblem<'a> {
    gate: Gate,
    potential: &'a [f64],
}

impl<'a> GateProblem<'a> {
    /// Creates the problem for `gate` at the given nodal potentials.
    #[must_use]
    pub fn new(gate: Gate, potential: &'a [f64]) -> Self {
        Self { gate, potential }
    }
}

impl OdeProblem for GateProblem<'_> {
    type Error = Infallible;

    fn derivative(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
        debug_assert_eq!(y.len(), self.potential.len());
        for ((d, x), v) in dydt.iter_mut().zip(y).zip(self.potential) {
            *d = self.gate.derivative(*v, *x);
        }
        Ok(())
    }

    /// Steady state of the gate at the current potentials.
    fn initial_condition(&self) -> Vec<f64> {
        self.potential
            .iter()
            .map(|&v| self.gate.steady_state(v))
            .collect()
    }

    /// The Jacobian is diagonal with entries `-(α + β)`.
    fn spectral_radius(&self, _t: f64, _y: &[f64]) -> Option<f64> {
        Some(
            self.potential
                .iter()
                .map(|&v| self.gate.rate(v))
                .fold(0.0, f64::max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn initial_condition_is_at_rest() {
        let potential = [-64.974, -20.0];
        let problem = GateProblem::new(Gate::M, &potential);

        let y0 = problem.initial_condition();
        let mut dydt = [1.0; 2];
        problem.derivative(0.0, &y0, &mut dydt).unwrap();

        assert_relative_eq!(dydt[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(dydt[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn spectral_radius_is_largest_rate() {
        let potential = [-80.0, -40.0, 10.0];
        let problem = GateProblem::new(Gate::M, &potential);

        let expected = potential
            .iter()
            .map(|&v| Gate::M.rate(v))
            .fold(0.0, f64::max);
        assert_relative_eq!(problem.spectral_radius(0.0, &[0.0; 3]).unwrap(), expected);
    }
}
