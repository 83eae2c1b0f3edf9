//! Hodgkin–Huxley gating kinetics.
//!
//! Each gate `x ∈ {n, m, h}` obeys
//!
//! ```text
//! dx/dt = α_x(V) (1 - x) - β_x(V) x
//! ```
//!
//! with voltages in millivolts and rates in 1/ms, using the convention of a
//! resting potential near -65 mV.

use std::fmt;

/// A gating variable of the Hodgkin–Huxley model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Potassium activation.
    N,
    /// Sodium activation.
    M,
    /// Sodium inactivation.
    H,
}

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::N, Gate::M, Gate::H];

    /// Returns the field name of the gate.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Gate::N => "n",
            Gate::M => "m",
            Gate::H => "h",
        }
    }

    /// Opening rate at potential `v`.
    #[must_use]
    pub fn alpha(self, v: f64) -> f64 {
        match self {
            Gate::N => 0.01 * vtrap(-(v + 55.0), 10.0),
            Gate::M => 0.1 * vtrap(-(v + 40.0), 10.0),
            Gate::H => 0.07 * (-(v + 65.0) / 20.0).exp(),
        }
    }

    /// Closing rate at potential `v`.
    #[must_use]
    pub fn beta(self, v: f64) -> f64 {
        match self {
            Gate::N => 0.125 * (-(v + 65.0) / 80.0).exp(),
            Gate::M => 4.0 * (-(v + 65.0) / 18.0).exp(),
            Gate::H => 1.0 / ((-(v + 35.0) / 10.0).exp() + 1.0),
        }
    }

    /// Relaxation rate `α + β`, the magnitude of `∂(dx/dt)/∂x`.
    #[must_use]
    pub fn rate(self, v: f64) -> f64 {
        self.alpha(v) + self.beta(v)
    }

    /// Steady-state opening `α / (α + β)` at potential `v`.
    #[must_use]
    pub fn steady_state(self, v: f64) -> f64 {
        self.alpha(v) / self.rate(v)
    }

    /// Right-hand side of the gate equation.
    #[must_use]
    pub fn derivative(self, v: f64, x: f64) -> f64 {
        self.alpha(v) * (1.0 - x) - self.beta(v) * x
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `x / (exp(x / y) - 1)`, continuous through `x = 0`.
fn vtrap(x: f64, y: f64) -> f64 {
    let r = x / y;
    if r.abs() < 1e-6 {
        y * (1.0 - r / 2.0)
    } else {
        x / r.exp_m1()
    }
}
