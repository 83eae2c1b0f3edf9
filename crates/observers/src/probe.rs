use chebstep_core::Observer;
use log::warn;

use crate::traits::{HasField, HasTime};

/// Records the value of one field at one node over time.
///
/// Events without the field, or with fewer nodes than expected, are skipped;
/// the first skip is logged as a warning.
///
/// # Example
///
/// ```ignore
/// let mut probe = Probe::new("potential", mesh.probe_node());
/// simulation::solve(&mesh, &membrane, &stimulus, &config, &mut probe)?;
///
/// for (t, v) in probe.samples() {
///     println!("{t}\t{v}");
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    field: String,
    node: usize,
    samples: Vec<(f64, f64)>,
    skipped: usize,
}

impl Probe {
    /// Creates a probe for `field` at `node`.
    pub fn new(field: impl Into<String>, node: usize) -> Self {
        Self {
            field: field.into(),
            node,
            samples: Vec::new(),
            skipped: 0,
        }
    }

    /// Returns the recorded `(time, value)` pairs in arrival order.
    #[must_use]
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Consumes the probe and returns its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<(f64, f64)> {
        self.samples
    }

    /// Returns the number of events that could not be sampled.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Records a sample from `event`, if it carries the probed value.
    pub fn record<E: HasTime + HasField>(&mut self, event: &E) {
        match event.field(&self.field).and_then(|values| values.get(self.node)) {
            Some(&value) => self.samples.push((event.time(), value)),
            None => {
                if self.skipped == 0 {
                    warn!(
                        "probe cannot read node {} of field `{}`",
                        self.node, self.field
                    );
                }
                self.skipped += 1;
            }
        }
    }
}

impl<E, A> Observer<E, A> for Probe
where
    E: HasTime + HasField,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event);
        None
    }
}

/// Allows `&mut Probe` to be passed to drivers that take an observer by value,
/// so the samples can be read after the run completes.
impl<E, A> Observer<E, A> for &mut Probe
where
    E: HasTime + HasField,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        time: f64,
        values: Vec<f64>,
    }

    impl HasTime for Sample {
        fn time(&self) -> f64 {
            self.time
        }
    }

    impl HasField for Sample {
        fn field(&self, name: &str) -> Option<&[f64]> {
            (name == "u").then_some(self.values.as_slice())
        }
    }

    fn observe(probe: &mut Probe, event: &Sample) {
        let action: Option<()> = probe.observe(event);
        assert!(action.is_none());
    }

    #[test]
    fn records_time_series() {
        let mut probe = Probe::new("u", 1);
        let events = [
            Sample {
                time: 0.0,
                values: vec![5.0, 6.0],
            },
            Sample {
                time: 0.5,
                values: vec![7.0, 8.0],
            },
        ];
        for event in &events {
            observe(&mut probe, event);
        }
        assert_eq!(probe.samples(), &[(0.0, 6.0), (0.5, 8.0)]);
        assert_eq!(probe.skipped(), 0);
    }

    #[test]
    fn skips_missing_values() {
        let mut wrong_field = Probe::new("v", 0);
        let mut wrong_node = Probe::new("u", 9);
        let event = Sample {
            time: 1.0,
            values: vec![1.0],
        };

        observe(&mut wrong_field, &event);
        observe(&mut wrong_node, &event);
        observe(&mut wrong_node, &event);

        assert!(wrong_field.samples().is_empty());
        assert_eq!(wrong_field.skipped(), 1);
        assert_eq!(wrong_node.skipped(), 2);
    }
}
