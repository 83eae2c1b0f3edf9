use std::convert::Infallible;

use chebstep_core::OdeProblem;

use crate::{
    membrane::{Membrane, Stimulus},
    mesh::Mesh,
};

/// Membrane potential along the cable.
///
/// ```text
/// dV/dt = D ΔV + (I_stim(t) - I_ion(V, n, m, h)) / C
/// ```
///
/// The gate openings are borrowed and held fixed over the step.
#[derive(Debug, Clone, Copy)]
pub struct CableProblem<'a> {
    mesh: &'a Mesh,
    membrane: &'a Membrane,
    stimulus: &'a Stimulus,
    n: &'a [f64],
    m: &'a [f64],
    h: &'a [f64],
}

impl<'a> CableProblem<'a> {
    /// Creates the problem for the given gate openings.
    #[must_use]
    pub fn new(
        mesh: &'a Mesh,
        membrane: &'a Membrane,
        stimulus: &'a Stimulus,
        [n, m, h]: [&'a [f64]; 3],
    ) -> Self {
        debug_assert!([n, m, h].iter().all(|g| g.len() == mesh.len()));
        Self {
            mesh,
            membrane,
            stimulus,
            n,
            m,
            h,
        }
    }

    fn gates(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.n
            .iter()
            .zip(self.m)
            .zip(self.h)
            .map(|((&n, &m), &h)| (n, m, h))
    }
}

impl OdeProblem for CableProblem<'_> {
    type Error = Infallible;

    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
        let Membrane {
            capacitance,
            diffusion,
            ..
        } = *self.membrane;

        self.mesh.laplacian(y, dydt);
        let nodes = dydt.iter_mut().zip(y).zip(self.gates()).enumerate();
        for (node, ((d, &v), (n, m, h))) in nodes {
            let ionic = self.membrane.ionic_current(v, n, m, h);
            let applied = self.stimulus.current(self.mesh, node, t);
            *d = diffusion * *d + (applied - ionic) / capacitance;
        }
        Ok(())
    }

    /// Uniform resting potential.
    fn initial_condition(&self) -> Vec<f64> {
        vec![self.membrane.rest; self.mesh.len()]
    }

    /// Gershgorin bound on the Jacobian.
    ///
    /// Row `i` has diagonal `-(k_i D / dx² + g_i / C)` and `k_i` off-diagonal
    /// entries `D / dx²`, where `k_i` is the node degree and `g_i` the total
    /// membrane conductance.
    fn spectral_radius(&self, _t: f64, _y: &[f64]) -> Option<f64> {
        let Membrane {
            capacitance,
            diffusion,
            ..
        } = *self.membrane;
        let coupling = diffusion / (self.mesh.dx() * self.mesh.dx());

        let rho = self
            .gates()
            .enumerate()
            .map(|(node, (n, m, h))| {
                let degree = self.mesh.neighbours(node).len() as f64;
                2.0 * degree * coupling + self.membrane.conductance(n, m, h) / capacitance
            })
            .fold(0.0, f64::max);
        Some(rho)
    }
}
