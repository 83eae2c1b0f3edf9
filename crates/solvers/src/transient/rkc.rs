//! Runge–Kutta–Chebyshev (RKC) stepper for stiff ODE problems.
//!
//! RKC is an explicit, second-order method whose stage count grows with the
//! stiffness of the problem. Its stability interval on the negative real axis
//! has length `≈ 0.653 s²` for `s` stages, so a step of size `dt` on a problem
//! with spectral radius `rho` is stable once `dt * rho` fits in that interval.
//! No linear systems are solved: stiffness is paid for with extra right-hand
//! side evaluations instead.
//!
//! # Algorithm
//!
//! Each step:
//!
//! 1. Evaluate `f(t, y)` (reused from the previous step within one call when
//!    adaptivity is on).
//! 2. Obtain the spectral radius: power iteration on finite differences of the
//!    right-hand side, a cached estimate, or [`OdeProblem::spectral_radius`].
//! 3. Select the smallest stage count whose stability boundary covers
//!    `dt * rho`; fail if even the maximum stage count does not.
//! 4. Run the three-term Chebyshev recurrence over the stages.
//! 5. If adaptive, estimate the local error, accept or reject, and rescale
//!    `dt`. Rejected steps are retried at the smaller step size.
//!
//! # Coupled subsystems
//!
//! The stepper never stores a reference to a problem or state, so one
//! [`Rkc`] per subsystem can advance coupled fields in whatever fixed order
//! the driver chooses, each problem borrowing the others' current values.
//!
//! # Example
//!
//! ```ignore
//! use chebstep_core::StateVector;
//! use chebstep_solvers::transient::rkc::{Config, Rkc, Status};
//!
//! let mut stepper = Rkc::new(Config::default());
//! let mut state = StateVector::from_problem("u", &problem, 0.0, 1.0);
//! let mut dt = 1e-3;
//!
//! stepper.check_correctness(dt)?;
//! while stepper.advance(&problem, &mut state, &mut dt)? == Status::Continue {}
//! stepper.print_statistics();
//! ```

mod config;
mod control;
mod error;
mod recurrence;
mod spectral;
mod stages;
mod statistics;
mod status;


pub use config::{Config, ConfigError, MIN_STAGES, RadiusEstimation};
pub use control::{Controller, Decision, ORDER, error_norm};
pub use error::Error;
pub use spectral::{Estimate, estimate};
pub use stages::{BudgetExceeded, Chebyshev, DAMPING, select_stages, stability_boundary};
pub use statistics::Statistics;
pub use status::Status;

use chebstep_core::{OdeProblem, StateVector};
use log::{debug, info};

use recurrence::StageBuffers;

/// State vector a cached estimate was measured on, as of its last commit.
#[derive(Debug, Clone, PartialEq)]
struct Owner {
    name: String,
    len: usize,
    time: f64,
}

/// Cached spectral radius and its dominant direction.
///
/// Both belong to the state last committed by the stepper. They are dropped
/// as soon as `advance` is called with any other state, or with the same
/// state at a different time, so an estimate never crosses problems.
#[derive(Debug, Clone, Default)]
struct RadiusCache {
    owner: Option<Owner>,
    rho: Option<f64>,
    direction: Option<Vec<f64>>,
    age: usize,
}

impl RadiusCache {
    /// Keeps the cache only if `state` continues where the last commit left off.
    fn claim(&mut self, state: &StateVector) {
        let continues = self.owner.as_ref().is_some_and(|owner| {
            owner.name == state.name() && owner.len == state.len() && owner.time == state.time()
        });
        if !continues {
            *self = Self {
                owner: Some(Owner {
                    name: state.name().to_owned(),
                    len: state.len(),
                    time: state.time(),
                }),
                ..Self::default()
            };
        }
    }

    fn reusable(&self, reuse_steps: usize) -> Option<f64> {
        self.rho.filter(|_| self.age <= reuse_steps)
    }

    fn store(&mut self, rho: f64, direction: Vec<f64>) {
        self.rho = Some(rho);
        self.direction = Some(direction);
        self.age = 0;
    }

    fn committed(&mut self, time: f64) {
        if let Some(owner) = &mut self.owner {
            owner.time = time;
        }
        self.age += 1;
    }

    /// Forces a new estimate while keeping the direction as a warm start.
    fn invalidate(&mut self) {
        self.rho = None;
    }
}

/// A stabilized explicit stepper.
///
/// Holds the immutable [`Config`] and the mutable per-instance state: the
/// last accepted step size, the cached spectral radius with the direction
/// that warm-starts the next estimate, and [`Statistics`].
///
/// A stepper may advance several state vectors in turn. The cached radius
/// and direction only carry over between calls that continue the same state
/// from its last committed time, so replaying a saved state through a used
/// stepper gives the same values as a fresh stepper.
#[derive(Debug, Clone)]
pub struct Rkc {
    config: Config,
    controller: Controller,
    cache: RadiusCache,
    last_dt: Option<f64>,
    stats: Statistics,
}

impl Rkc {
    /// Creates a stepper with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            controller: Controller::new(&config),
            config,
            cache: RadiusCache::default(),
            last_dt: None,
            stats: Statistics::default(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the running statistics.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Returns the size of the last accepted step, if any.
    #[must_use]
    pub fn last_step(&self) -> Option<f64> {
        self.last_dt
    }

    /// Checks the configuration and the initial step size before stepping.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, which is also logged.
    pub fn check_correctness(&self, dt: f64) -> Result<(), ConfigError> {
        self.config.validate(dt).inspect_err(|e| {
            log::error!("RKC configuration rejected: {e}");
        })
    }

    /// Logs the configuration.
    pub fn print_info(&self) {
        info!("{}", self.config);
    }

    /// Logs the statistics.
    pub fn print_statistics(&self) {
        info!("{}", self.stats);
    }

    /// Advances `state` under `problem`.
    ///
    /// Takes one accepted step if [`Config::one_step`] is set, and otherwise
    /// steps until the state's end time is reached. The stepper does not clip
    /// the last step to the end time. With adaptivity enabled `dt` is updated
    /// to the proposed size of the next step; otherwise it is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] on any fatal condition. The state then keeps its
    /// last accepted values and time.
    pub fn advance<P: OdeProblem>(
        &mut self,
        problem: &P,
        state: &mut StateVector,
        dt: &mut f64,
    ) -> Result<Status, Error> {
        self.config.validate(*dt)?;
        if state.is_finished() {
            return Ok(Status::Finished);
        }
        self.cache.claim(state);

        let n = state.len();
        let mut t = state.time();
        let mut y = state.values().to_vec();
        let mut f0 = vec![0.0; n];
        let mut y1 = vec![0.0; n];
        let mut f1 = vec![0.0; n];
        let mut buffers = StageBuffers::new(n);
        let mut rejections = 0;

        self.evaluate(problem, t, &y, &mut f0)?;

        loop {
            let h = *dt;
            let rho = self.spectral_radius(problem, t, &y, &f0)?;
            let stages = select_stages(rho, h, self.config.min_stages, self.config.max_stages)
                .map_err(|e| Error::StabilityBudgetExceeded {
                    time: t,
                    demand: e.demand,
                    max_stages: e.max_stages,
                    boundary: e.boundary,
                })?;
            self.stats.record_stages(stages);

            let evaluations =
                recurrence::step(problem, t, h, stages, &y, &f0, &mut buffers, &mut y1)
                    .map_err(Error::problem)?;
            self.stats.rhs_evaluations += evaluations;

            if !y1.iter().all(|v| v.is_finite()) {
                return Err(Error::NonFinite {
                    time: t,
                    context: "stage recurrence",
                });
            }

            if self.config.adaptive {
                self.evaluate(problem, t + h, &y1, &mut f1)?;
                let err = error_norm(&y, &y1, &f0, &f1, h, self.config.atol, self.config.rtol);
                let decision = self.controller.control(err, h);

                if !decision.accept {
                    self.stats.rejected_steps += 1;
                    rejections += 1;
                    self.cache.invalidate();
                    if self.config.verbose {
                        debug!(
                            "{}: rejected t = {t:e}, dt = {h:e}, err = {err:.3}, retry dt = {:e}",
                            state.name(),
                            decision.dt
                        );
                    }
                    if rejections > self.config.max_rejections {
                        return Err(Error::TooManyRejections {
                            time: t,
                            rejections,
                        });
                    }
                    if !(decision.dt >= self.config.min_step) {
                        return Err(Error::StepSizeCollapsed {
                            time: t,
                            dt: decision.dt,
                        });
                    }
                    *dt = decision.dt;
                    continue;
                }

                rejections = 0;
                *dt = decision.dt;
                // f(y_{n+1}) is the first derivative of the next step.
                std::mem::swap(&mut f0, &mut f1);
            }

            t += h;
            state.commit(&y1, t);
            std::mem::swap(&mut y, &mut y1);

            self.stats.accepted_steps += 1;
            self.last_dt = Some(h);
            self.cache.committed(t);

            if self.config.verbose {
                debug!(
                    "{}: t = {t:e}, dt = {h:e}, stages = {stages}, rho = {rho:e}",
                    state.name()
                );
            }

            if state.is_finished() {
                return Ok(Status::Finished);
            }
            if self.config.one_step {
                return Ok(Status::Continue);
            }
            if !self.config.adaptive {
                self.evaluate(problem, t, &y, &mut f0)?;
            }
        }
    }

    /// Evaluates the right-hand side and rejects non-finite derivatives.
    fn evaluate<P: OdeProblem>(
        &mut self,
        problem: &P,
        t: f64,
        y: &[f64],
        dydt: &mut [f64],
    ) -> Result<(), Error> {
        problem.derivative(t, y, dydt).map_err(Error::problem)?;
        self.stats.rhs_evaluations += 1;

        if dydt.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(Error::NonFinite {
                time: t,
                context: "right-hand side",
            })
        }
    }

    /// Returns the spectral radius for the next step attempt.
    fn spectral_radius<P: OdeProblem>(
        &mut self,
        problem: &P,
        t: f64,
        y: &[f64],
        fy: &[f64],
    ) -> Result<f64, Error> {
        let rho = match self.config.radius {
            RadiusEstimation::External => problem
                .spectral_radius(t, y)
                .ok_or(Error::MissingSpectralRadius)?,
            RadiusEstimation::Internal { reuse_steps } => {
                if let Some(rho) = self.cache.reusable(reuse_steps) {
                    rho
                } else {
                    let estimate = estimate(problem, t, y, fy, self.cache.direction.as_deref())
                        .map_err(Error::problem)?;
                    self.stats.radius_estimates += 1;
                    self.stats.rhs_evaluations += estimate.iterations;
                    if !estimate.converged {
                        self.stats.unconverged_estimates += 1;
                        if self.config.verbose {
                            debug!(
                                "spectral radius did not converge at t = {t:e}, using {:e}",
                                estimate.rho
                            );
                        }
                    }
                    self.cache.store(estimate.rho, estimate.direction);
                    estimate.rho
                }
            }
        };

        if !rho.is_finite() || rho < 0.0 {
            return Err(Error::NonFinite {
                time: t,
                context: "spectral radius",
            });
        }

        self.stats.last_spectral_radius = rho;
        Ok(rho)
    }
}
