//! Right-hand sides of the coupled cable subsystems.
//!
//! Each problem borrows the current values of the subsystems it depends on,
//! so the driver rebuilds it before every step.

pub mod cable;
pub mod gate;

pub use cable::CableProblem;
pub use gate::GateProblem;
