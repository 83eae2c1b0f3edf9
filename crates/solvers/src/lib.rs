//! Stabilized explicit solvers for stiff ODE problems.
//!
//! # Modules
//!
//! - [`transient`] — time integrators that advance a [`StateVector`] under an
//!   [`OdeProblem`]
//!
//! [`StateVector`]: chebstep_core::StateVector
//! [`OdeProblem`]: chebstep_core::OdeProblem

pub mod transient;
