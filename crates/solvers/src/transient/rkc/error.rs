use std::error::Error as StdError;

use thiserror::Error;

use super::config::ConfigError;

/// Fatal outcomes of an RKC step.
///
/// Whenever `advance` returns one of these, the state vector still holds its
/// last accepted values and time. Callers are expected to stop their loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error(
        "stability budget exceeded at t = {time}: dt * rho = {demand:e} but {max_stages} stages only reach {boundary:e}"
    )]
    StabilityBudgetExceeded {
        time: f64,
        demand: f64,
        max_stages: usize,
        boundary: f64,
    },

    #[error("non-finite value in {context} at t = {time}")]
    NonFinite { time: f64, context: &'static str },

    #[error("step size collapsed to {dt:e} at t = {time}")]
    StepSizeCollapsed { time: f64, dt: f64 },

    #[error("{rejections} consecutive rejected steps at t = {time}")]
    TooManyRejections { time: f64, rejections: usize },

    #[error("problem does not supply a spectral radius")]
    MissingSpectralRadius,

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }

    /// Returns `true` if the error stems from the stability budget.
    #[must_use]
    pub fn is_stability_budget(&self) -> bool {
        matches!(self, Self::StabilityBudgetExceeded { .. })
    }
}
