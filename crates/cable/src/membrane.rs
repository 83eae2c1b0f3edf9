//! Membrane parameters and the applied stimulus.
//!
//! Units follow the usual Hodgkin–Huxley conventions: mV, ms, µF/cm²,
//! mS/cm², µA/cm² and cm.

use uom::si::{
    electric_potential::millivolt,
    f64::{ElectricPotential, Length, Time},
    length::centimeter,
    time::millisecond,
};

use crate::{kinetics::Gate, mesh::Mesh};

/// Passive and active properties of the membrane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Membrane {
    /// Capacitance, µF/cm².
    pub capacitance: f64,
    /// Maximal sodium conductance, mS/cm².
    pub g_na: f64,
    /// Maximal potassium conductance, mS/cm².
    pub g_k: f64,
    /// Leak conductance, mS/cm².
    pub g_leak: f64,
    /// Sodium reversal potential, mV.
    pub e_na: f64,
    /// Potassium reversal potential, mV.
    pub e_k: f64,
    /// Leak reversal potential, mV.
    pub e_leak: f64,
    /// Axial diffusion coefficient `a / (2 R C)`, cm²/ms.
    pub diffusion: f64,
    /// Resting potential, mV.
    pub rest: f64,
}

impl Default for Membrane {
    /// Squid giant axon: radius 238 µm and axial resistivity 35.4 Ω·cm.
    fn default() -> Self {
        Self {
            capacitance: 1.0,
            g_na: 120.0,
            g_k: 36.0,
            g_leak: 0.3,
            e_na: 50.0,
            e_k: -77.0,
            e_leak: -54.387,
            diffusion: 0.0238 / (2.0 * 35.4) * 1e3,
            rest: -64.974,
        }
    }
}

impl Membrane {
    /// Returns the resting potential.
    #[must_use]
    pub fn rest_potential(&self) -> ElectricPotential {
        ElectricPotential::new::<millivolt>(self.rest)
    }

    /// Total membrane conductance for the given gate openings, mS/cm².
    #[must_use]
    pub fn conductance(&self, n: f64, m: f64, h: f64) -> f64 {
        self.g_na * m.powi(3) * h + self.g_k * n.powi(4) + self.g_leak
    }

    /// Outward ionic current density at potential `v`, µA/cm².
    #[must_use]
    pub fn ionic_current(&self, v: f64, n: f64, m: f64, h: f64) -> f64 {
        self.g_na * m.powi(3) * h * (v - self.e_na)
            + self.g_k * n.powi(4) * (v - self.e_k)
            + self.g_leak * (v - self.e_leak)
    }

    /// Gate openings in equilibrium with the resting potential.
    #[must_use]
    pub fn resting_gates(&self) -> [f64; 3] {
        Gate::ALL.map(|gate| gate.steady_state(self.rest))
    }
}

/// A current pulse injected near the free end of branch A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stimulus {
    /// Current density, µA/cm².
    pub amplitude: f64,
    /// Onset, ms.
    pub start: f64,
    /// Duration, ms.
    pub duration: f64,
    /// Length of cable covered from the free end, cm.
    pub extent: f64,
}

impl Default for Stimulus {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            start: 0.0,
            duration: 1.0,
            extent: 0.1,
        }
    }
}

impl Stimulus {
    /// Creates a pulse of `amplitude` µA/cm² over `[start, start + duration)`
    /// covering `extent` of cable from the free end of branch A.
    #[must_use]
    pub fn new(amplitude: f64, start: Time, duration: Time, extent: Length) -> Self {
        Self {
            amplitude,
            start: start.get::<millisecond>(),
            duration: duration.get::<millisecond>(),
            extent: extent.get::<centimeter>(),
        }
    }

    /// A stimulus that never fires.
    #[must_use]
    pub fn none() -> Self {
        Self {
            amplitude: 0.0,
            ..Self::default()
        }
    }

    /// Returns `true` while the pulse is on.
    #[must_use]
    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start && t < self.start + self.duration
    }

    /// Applied current density at `node` and time `t`, µA/cm².
    #[must_use]
    pub fn current(&self, mesh: &Mesh, node: usize, t: f64) -> f64 {
        if self.is_active(t) && self.covers(mesh, node) {
            self.amplitude
        } else {
            0.0
        }
    }

    fn covers(&self, mesh: &Mesh, node: usize) -> bool {
        node <= mesh.junction() && mesh.grid()[node] <= self.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::mesh::Branch;

    #[test]
    fn rest_is_nearly_an_equilibrium() {
        let membrane = Membrane::default();
        let [n, m, h] = membrane.resting_gates();
        let current = membrane.ionic_current(membrane.rest, n, m, h);
        assert!(current.abs() < 0.05, "resting current {current}");
    }

    #[test]
    fn diffusion_matches_squid_axon() {
        assert_relative_eq!(Membrane::default().diffusion, 0.336, epsilon = 1e-3);
    }

    #[test]
    fn conductance_is_current_slope() {
        let membrane = Membrane::default();
        let (n, m, h) = (0.4, 0.2, 0.5);
        let slope = membrane.ionic_current(1.0, n, m, h) - membrane.ionic_current(0.0, n, m, h);
        assert_relative_eq!(slope, membrane.conductance(n, m, h), max_relative = 1e-12);
    }

    #[test]
    fn stimulus_covers_free_end_during_pulse() {
        let mesh = Mesh::y_junction(Length::new::<centimeter>(0.01)).unwrap();
        let stimulus = Stimulus::default();

        assert_relative_eq!(stimulus.current(&mesh, 0, 0.5), 100.0);
        assert_relative_eq!(stimulus.current(&mesh, 9, 0.5), 100.0);
        assert_relative_eq!(stimulus.current(&mesh, 12, 0.5), 0.0);
        assert_relative_eq!(stimulus.current(&mesh, 0, 1.0), 0.0);
        let b = mesh.branch(Branch::B).start;
        assert_relative_eq!(stimulus.current(&mesh, b, 0.5), 0.0);
    }

    #[test]
    fn silent_stimulus_injects_nothing() {
        let mesh = Mesh::y_junction(Length::new::<centimeter>(0.01)).unwrap();
        assert_relative_eq!(Stimulus::none().current(&mesh, 0, 0.5), 0.0);
    }
}
