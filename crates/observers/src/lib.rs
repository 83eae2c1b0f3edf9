//! Reusable observers for chebstep time loops.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across drivers that emit time-stamped field events.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-driver observers
//!   ([`HasTime`], [`HasField`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`Probe`] records one field at one node over time.
//! - [`StopAt`] ends a run once the simulated time passes a threshold.
//!
//! [`Observer`]: chebstep_core::Observer
//! [`HasTime`]: traits::HasTime
//! [`HasField`]: traits::HasField
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod probe;
mod stop_at;

pub use probe::Probe;
pub use stop_at::StopAt;
