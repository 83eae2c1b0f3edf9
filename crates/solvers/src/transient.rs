//! Solvers for transient ODE problems — advancing a state forward in time.
//!
//! An [`OdeProblem`] maps `(t, y)` to `dy/dt`. Solvers in this module step a
//! [`StateVector`] forward under that right-hand side.
//!
//! # Solvers
//!
//! - [`rkc`] — stabilized explicit Runge–Kutta–Chebyshev stepping for stiff,
//!   diffusion-dominated problems
//!
//! [`OdeProblem`]: chebstep_core::OdeProblem
//! [`StateVector`]: chebstep_core::StateVector

pub mod rkc;
