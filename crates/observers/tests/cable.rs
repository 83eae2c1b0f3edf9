use chebstep_cable::{
    Membrane, Mesh, Stimulus,
    simulation::{self, Action, Event, POTENTIAL, Status},
};
use chebstep_core::Observer;
use chebstep_observers::{Probe, StopAt};
use approx::assert_relative_eq;
use uom::si::{electric_potential::millivolt, f64::Length, length::centimeter};

fn mesh() -> Mesh {
    Mesh::y_junction(Length::new::<centimeter>(0.05)).unwrap()
}

fn config() -> simulation::Config {
    simulation::Config {
        end_time: 2.0,
        dt: 0.01,
        ..simulation::Config::default()
    }
}

#[test]
fn probe_records_every_iteration() {
    let mesh = mesh();
    let mut probe = Probe::new(POTENTIAL, mesh.probe_node());

    let solution = simulation::solve(
        &mesh,
        &Membrane::default(),
        &Stimulus::default(),
        &config(),
        &mut probe,
    )
    .unwrap();

    assert_eq!(solution.status, Status::Finished);
    assert_eq!(probe.samples().len(), solution.iterations + 1);
    assert_eq!(probe.skipped(), 0);

    let (first_time, first_value) = probe.samples()[0];
    assert_eq!(first_time, 0.0);
    let rest = Membrane::default().rest_potential();
    assert_relative_eq!(first_value, rest.get::<millivolt>(), max_relative = 1e-12);
    assert!(probe.samples().windows(2).all(|w| w[1].0 > w[0].0));
}

#[test]
fn stop_at_ends_run_early() {
    let mesh = mesh();
    let mut probe = Probe::new("m", 0);
    let mut stop = StopAt::new(0.5);

    let solution = simulation::solve(
        &mesh,
        &Membrane::default(),
        &Stimulus::default(),
        &config(),
        |event: &Event<'_>| -> Option<Action> {
            probe.record(event);
            stop.observe(event)
        },
    )
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    let time = solution.fields.potential.time();
    assert!((0.5..0.52).contains(&time), "stopped at {time}");
    assert_eq!(probe.samples().last().map(|s| s.0), Some(time));
}
