use super::Fields;

/// Event emitted by the driver after every outer iteration.
///
/// Iteration 0 is the resting state before any step, emitted before the
/// gates are staggered.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The outer iteration number.
    pub iteration: usize,

    /// All fields after the iteration.
    pub fields: &'a Fields,
}

impl Event<'_> {
    /// Returns the time of the membrane potential.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.fields.potential.time()
    }
}
