//! Core traits and types for stabilized explicit time stepping.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! problem definitions build on:
//!
//! - [`OdeProblem`] — a right-hand side `(t, y) -> dy/dt` with an initial
//!   condition and an optional spectral radius bound
//! - [`StateVector`] — a named, fixed-length field of unknowns with its
//!   current and target time
//! - [`Observer`] — receives solver or driver events and optionally returns
//!   control actions

mod observer;
mod problems;
mod state;

pub use observer::Observer;
pub use problems::OdeProblem;
pub use state::StateVector;
