use crate::OdeProblem;

/// A named field of unknowns sampled at mesh points, with its current time.
///
/// The number of unknowns is fixed when the vector is created: values are only
/// exposed as a shared slice and replaced through [`StateVector::commit`], so
/// no caller can grow or shrink them. The current
/// `time` only moves forward through [`StateVector::commit`], and the vector
/// counts as finished once `time` reaches `end_time`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct StateVector {
    name: String,
    values: Vec<f64>,
    time: f64,
    end_time: f64,
}

impl StateVector {
    /// Creates a state vector with the given values at `time`.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>, time: f64, end_time: f64) -> Self {
        Self {
            name: name.into(),
            values,
            time,
            end_time,
        }
    }

    /// Creates a state vector from a problem's initial condition.
    #[must_use]
    pub fn from_problem<P: OdeProblem>(
        name: impl Into<String>,
        problem: &P,
        time: f64,
        end_time: f64,
    ) -> Self {
        Self::new(name, problem.initial_condition(), time, end_time)
    }

    /// Returns the name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of unknowns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the vector holds no unknowns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the current time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the time at which integration is considered finished.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Returns `true` once the current time has reached the end time.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.time >= self.end_time
    }

    /// Replaces the values and moves the current time forward.
    ///
    /// Solvers call this once per accepted step, so the vector always holds
    /// the last good solution.
    ///
    /// # Panics
    ///
    /// Panics if `values` has a different length than the vector.
    pub fn commit(&mut self, values: &[f64], time: f64) {
        debug_assert!(time >= self.time, "time must not move backwards");
        self.values.copy_from_slice(values);
        self.time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn commit_replaces_values_and_time() {
        let mut state = StateVector::new("u", vec![1.0, 2.0, 3.0], 0.0, 1.0);

        state.commit(&[4.0, 5.0, 6.0], 0.25);

        assert_eq!(state.values(), &[4.0, 5.0, 6.0]);
        assert_relative_eq!(state.time(), 0.25);
        assert_eq!(state.len(), 3);
        assert!(!state.is_finished());
    }

    #[test]
    fn finished_once_end_time_is_reached() {
        let mut state = StateVector::new("u", vec![0.0], 0.0, 0.5);
        state.commit(&[1.0], 0.5);
        assert!(state.is_finished());
    }

    #[test]
    #[should_panic]
    fn commit_rejects_length_change() {
        let mut state = StateVector::new("u", vec![0.0, 0.0], 0.0, 1.0);
        state.commit(&[1.0], 0.1);
    }
}
