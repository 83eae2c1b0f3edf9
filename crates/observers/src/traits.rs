//! Capability traits for cross-driver observers.
//!
//! These traits abstract over driver-specific event and action types, enabling
//! observers to work generically across different time loops.
//!
//! # Event traits
//!
//! - [`HasTime`] — events that carry a simulated time
//! - [`HasField`] — events that expose named nodal fields
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use chebstep_core::Observer;
//! use chebstep_observers::traits::{CanStopEarly, HasField};
//!
//! /// Stops once any node of `field` exceeds `threshold`.
//! struct Threshold {
//!     field: &'static str,
//!     threshold: f64,
//! }
//!
//! impl<E: HasField, A: CanStopEarly> Observer<E, A> for Threshold {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let values = event.field(self.field)?;
//!         values
//!             .iter()
//!             .any(|&v| v > self.threshold)
//!             .then(A::stop_early)
//!     }
//! }
//! ```

use chebstep_cable::simulation;

/// An event that carries a simulated time.
pub trait HasTime {
    /// Returns the time of this event.
    fn time(&self) -> f64;
}

/// An event that exposes named nodal fields.
pub trait HasField {
    /// Returns the current values of the field called `name`, if present.
    fn field(&self, name: &str) -> Option<&[f64]>;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the driver early.
    fn stop_early() -> Self;
}

// --- simulation::Event ---

impl HasTime for simulation::Event<'_> {
    fn time(&self) -> f64 {
        simulation::Event::time(self)
    }
}

impl HasField for simulation::Event<'_> {
    fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.field(name).map(|state| state.values())
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for simulation::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
