use chebstep_core::StateVector;

use crate::{
    kinetics::Gate,
    membrane::Membrane,
    mesh::Mesh,
    problems::GateProblem,
};

/// Name of the membrane potential field.
pub const POTENTIAL: &str = "potential";

/// The four coupled fields of the cable, in stepping order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub potential: StateVector,
    pub n: StateVector,
    pub m: StateVector,
    pub h: StateVector,
}

impl Fields {
    /// Resting potential everywhere, with each gate at its steady state.
    #[must_use]
    pub fn at_rest(mesh: &Mesh, membrane: &Membrane, end_time: f64) -> Self {
        let rest = vec![membrane.rest; mesh.len()];
        let [n, m, h] = Gate::ALL.map(|gate| {
            StateVector::from_problem(gate.name(), &GateProblem::new(gate, &rest), 0.0, end_time)
        });
        let potential = StateVector::new(POTENTIAL, rest, 0.0, end_time);
        Self { potential, n, m, h }
    }

    /// Returns the state of `gate`.
    #[must_use]
    pub fn gate(&self, gate: Gate) -> &StateVector {
        match gate {
            Gate::N => &self.n,
            Gate::M => &self.m,
            Gate::H => &self.h,
        }
    }

    /// Looks a field up by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&StateVector> {
        self.all().into_iter().find(|state| state.name() == name)
    }

    /// Returns all fields in stepping order.
    #[must_use]
    pub fn all(&self) -> [&StateVector; 4] {
        [&self.potential, &self.n, &self.m, &self.h]
    }
}
