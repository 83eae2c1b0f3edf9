//! Branched Hodgkin–Huxley cable advanced with stabilized explicit steppers.
//!
//! A Y-shaped nerve fibre is discretized into a [`Mesh`]. The membrane
//! potential and the three gating variables n, m and h are four coupled
//! subsystems, each advanced by its own RKC stepper in a fixed
//! Gauss–Seidel order (see [`simulation`]).
//!
//! - [`mesh`] — geometry, node numbering and the discrete Laplacian
//! - [`kinetics`] — gating rates and steady states
//! - [`membrane`] — conductances, reversal potentials and the stimulus
//! - [`problems`] — [`OdeProblem`] implementations for each subsystem
//! - [`simulation`] — the lockstep driver
//!
//! [`OdeProblem`]: chebstep_core::OdeProblem

pub mod kinetics;
pub mod membrane;
pub mod mesh;
pub mod problems;
pub mod simulation;

pub use kinetics::Gate;
pub use membrane::{Membrane, Stimulus};
pub use mesh::{Branch, Mesh, MeshError};
pub use problems::{CableProblem, GateProblem};
