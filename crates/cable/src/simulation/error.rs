use chebstep_solvers::transient::rkc;

/// Errors that can occur while running a cable simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("end time must be finite and positive, got {0} ms")]
    EndTime(f64),

    #[error("{subsystem}: {source}")]
    Config {
        subsystem: &'static str,
        #[source]
        source: rkc::ConfigError,
    },

    #[error("{subsystem} failed at iteration {iteration}: {source}")]
    Step {
        subsystem: &'static str,
        iteration: usize,
        #[source]
        source: rkc::Error,
    },
}

impl Error {
    /// Returns the name of the subsystem that failed, if any.
    #[must_use]
    pub fn subsystem(&self) -> Option<&'static str> {
        match self {
            Self::EndTime(_) => None,
            Self::Config { subsystem, .. } | Self::Step { subsystem, .. } => Some(*subsystem),
        }
    }
}
