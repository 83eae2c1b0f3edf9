use chebstep_core::Observer;

use crate::traits::{CanStopEarly, HasTime};

/// Stops a run once the simulated time reaches `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopAt {
    time: f64,
}

impl StopAt {
    /// Creates an observer that stops at `time`.
    #[must_use]
    pub fn new(time: f64) -> Self {
        Self { time }
    }

    /// Returns the stopping time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }
}

impl<E: HasTime, A: CanStopEarly> Observer<E, A> for StopAt {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.time() >= self.time).then(A::stop_early)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tick(f64);

    impl HasTime for Tick {
        fn time(&self) -> f64 {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    struct Stop;

    impl CanStopEarly for Stop {
        fn stop_early() -> Self {
            Stop
        }
    }

    #[test]
    fn stops_once_time_is_reached() {
        let mut observer = StopAt::new(1.0);
        assert_eq!(observer.observe(&Tick(0.5)), None::<Stop>);
        assert_eq!(observer.observe(&Tick(1.0)), Some(Stop));
        assert_eq!(observer.observe(&Tick(2.0)), Some(Stop));
    }
}
