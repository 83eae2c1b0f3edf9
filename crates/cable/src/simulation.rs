//! Lockstep driver for the branched Hodgkin–Huxley cable.
//!
//! The membrane potential and the three gates are separate subsystems, each
//! advanced by its own [`Rkc`] stepper. They are coupled Gauss–Seidel style
//! in a fixed order:
//!
//! ```text
//! potential (sees n, m, h at t_k)
//!   -> n (sees V at t_{k+1})
//!   -> m (sees V at t_{k+1})
//!   -> h (sees V at t_{k+1})
//! ```
//!
//! Every later subsystem sees the already advanced earlier ones, so the order
//! is part of the numerical method and is never changed. All four steppers
//! share one step size variable: with adaptivity enabled each stepper may
//! rescale it for the ones that follow.
//!
//! By default the gates are first advanced by half a step, so they lead the
//! potential by `dt / 2` for the rest of the run.
//!
//! # Example
//!
//! ```ignore
//! use chebstep_cable::{Membrane, Mesh, Stimulus, simulation};
//!
//! let mesh = Mesh::y_junction(Length::new::<centimeter>(0.01))?;
//! let config = simulation::Config::default();
//! let solution = simulation::solve_unobserved(&mesh, &Membrane::default(), &Stimulus::default(), &config)?;
//!
//! for (name, stats) in &solution.statistics {
//!     println!("{name}:\n{stats}");
//! }
//! ```

mod action;
mod error;
mod event;
mod fields;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use fields::{Fields, POTENTIAL};
pub use solution::{Solution, Status};

use chebstep_core::Observer;
use chebstep_solvers::transient::rkc::{self, RadiusEstimation, Rkc};
use log::debug;
use uom::si::{f64::Time, time::millisecond};

use crate::{
    kinetics::Gate,
    membrane::{Membrane, Stimulus},
    mesh::Mesh,
    problems::{CableProblem, GateProblem},
};

/// Run parameters of a cable simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Final time, ms.
    pub end_time: f64,
    /// Initial step size, ms.
    pub dt: f64,
    /// Stepper configuration shared by all four subsystems.
    ///
    /// `one_step` is always forced on, since the subsystems must move in
    /// lockstep.
    pub solver: rkc::Config,
    /// Advance the gates by half a step before the first iteration.
    pub stagger_gates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            end_time: 10.0,
            dt: 5e-4,
            solver: rkc::Config::new(true, false, false, 1e-2, 1e-2, RadiusEstimation::default()),
            stagger_gates: true,
        }
    }
}

impl Config {
    /// Creates a config with the given end time and initial step size.
    #[must_use]
    pub fn new(end_time: Time, dt: Time) -> Self {
        Self {
            end_time: end_time.get::<millisecond>(),
            dt: dt.get::<millisecond>(),
            ..Self::default()
        }
    }

    /// Sets the stepper configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: rkc::Config) -> Self {
        self.solver = solver;
        self
    }

    /// Enables or disables the initial half step of the gates.
    #[must_use]
    pub fn with_stagger(mut self, stagger_gates: bool) -> Self {
        self.stagger_gates = stagger_gates;
        self
    }
}

/// Runs the cable simulation until a subsystem reaches the end time.
///
/// # Algorithm
///
/// 1. Build one stepper per subsystem and check each against `dt`.
/// 2. Start from rest and emit iteration 0 to the observer.
/// 3. If staggering, advance n, m and h by `dt / 2`.
/// 4. While every subsystem reports `Continue` and the potential has not
///    passed the end time, advance potential, n, m, h in that order and emit
///    an [`Event`].
///
/// # Observer
///
/// The observer receives an [`Event`] after every iteration and may return
/// [`Action::StopEarly`] to end the run.
///
/// # Errors
///
/// Returns an [`Error`] naming the failing subsystem if a configuration check
/// or a step fails. Fields are not returned on error.
pub fn solve<Obs>(
    mesh: &Mesh,
    membrane: &Membrane,
    stimulus: &Stimulus,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    if !config.end_time.is_finite() || config.end_time <= 0.0 {
        return Err(Error::EndTime(config.end_time));
    }

    let solver = config.solver.with_one_step(true);
    let mut cable = Rkc::new(solver);
    let mut gates = Gate::ALL.map(|_| Rkc::new(solver));

    cable
        .check_correctness(config.dt)
        .map_err(|source| Error::Config {
            subsystem: POTENTIAL,
            source,
        })?;
    for (gate, stepper) in Gate::ALL.iter().zip(&gates) {
        stepper
            .check_correctness(config.dt)
            .map_err(|source| Error::Config {
                subsystem: gate.name(),
                source,
            })?;
    }

    if solver.verbose {
        mesh.print_info();
        cable.print_info();
    }

    let mut fields = Fields::at_rest(mesh, membrane, config.end_time);
    let mut dt = config.dt;

    let event = Event {
        iteration: 0,
        fields: &fields,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(finish(Status::StoppedByObserver, 0, fields, &cable, &gates));
    }

    if config.stagger_gates {
        let mut half = dt / 2.0;
        advance_gates(&mut gates, &mut fields, &mut half, 0)?;
        dt = half * 2.0;
    }

    let mut iteration = 0;
    let mut finished = false;

    while !finished && fields.potential.time() <= config.end_time {
        iteration += 1;

        let problem = CableProblem::new(
            mesh,
            membrane,
            stimulus,
            [fields.n.values(), fields.m.values(), fields.h.values()],
        );
        let status = cable
            .advance(&problem, &mut fields.potential, &mut dt)
            .map_err(|source| Error::Step {
                subsystem: POTENTIAL,
                iteration,
                source,
            })?;
        let gate_status = advance_gates(&mut gates, &mut fields, &mut dt, iteration)?;

        finished = status == rkc::Status::Finished || gate_status == rkc::Status::Finished;

        let event = Event {
            iteration,
            fields: &fields,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            debug!("cable simulation stopped by observer at iteration {iteration}");
            return Ok(finish(
                Status::StoppedByObserver,
                iteration,
                fields,
                &cable,
                &gates,
            ));
        }
    }

    cable.print_statistics();
    Ok(finish(Status::Finished, iteration, fields, &cable, &gates))
}

/// Runs the cable simulation without observation.
///
/// This is a convenience wrapper around [`solve`].
///
/// # Errors
///
/// Returns an [`Error`] if a configuration check or a step fails.
pub fn solve_unobserved(
    mesh: &Mesh,
    membrane: &Membrane,
    stimulus: &Stimulus,
    config: &Config,
) -> Result<Solution, Error> {
    solve(mesh, membrane, stimulus, config, ())
}

/// Advances n, m and h against the current potential.
///
/// Returns `Finished` if any gate reached the end time.
fn advance_gates(
    steppers: &mut [Rkc; 3],
    fields: &mut Fields,
    dt: &mut f64,
    iteration: usize,
) -> Result<rkc::Status, Error> {
    let Fields { potential, n, m, h } = fields;
    let mut status = rkc::Status::Continue;

    for ((gate, stepper), state) in Gate::ALL.into_iter().zip(steppers).zip([n, m, h]) {
        let problem = GateProblem::new(gate, potential.values());
        let gate_status =
            stepper
                .advance(&problem, state, dt)
                .map_err(|source| Error::Step {
                    subsystem: gate.name(),
                    iteration,
                    source,
                })?;
        if gate_status == rkc::Status::Finished {
            status = rkc::Status::Finished;
        }
    }

    Ok(status)
}

fn finish(
    status: Status,
    iterations: usize,
    fields: Fields,
    cable: &Rkc,
    gates: &[Rkc; 3],
) -> Solution {
    let [n, m, h] = gates;
    Solution {
        status,
        iterations,
        fields,
        statistics: [
            (POTENTIAL, *cable.statistics()),
            (Gate::N.name(), *n.statistics()),
            (Gate::M.name(), *m.statistics()),
            (Gate::H.name(), *h.statistics()),
        ],
    }
}
