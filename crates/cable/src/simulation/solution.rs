use chebstep_solvers::transient::rkc::Statistics;

use super::Fields;

/// Indicates how the simulation terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A subsystem reached the end time.
    Finished,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a cable simulation.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the simulation terminated.
    pub status: Status,

    /// Number of outer iterations completed.
    pub iterations: usize,

    /// Final fields.
    pub fields: Fields,

    /// Stepper statistics per subsystem, in stepping order.
    pub statistics: [(&'static str, Statistics); 4],
}
