use std::fmt;

/// Running counters of an RKC stepper.
///
/// Statistics are diagnostic only and never influence the numerical result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Statistics {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    /// Right-hand side evaluations, including those spent on power iteration.
    pub rhs_evaluations: usize,
    pub radius_estimates: usize,
    /// Power iterations that hit their cap without converging.
    pub unconverged_estimates: usize,
    pub max_stages: usize,
    /// Stage count of the most recent step attempt.
    pub last_stages: usize,
    /// Spectral radius used by the most recent step attempt.
    pub last_spectral_radius: f64,
}

impl Statistics {
    pub(crate) fn record_stages(&mut self, stages: usize) {
        self.last_stages = stages;
        self.max_stages = self.max_stages.max(stages);
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RKC statistics")?;
        writeln!(f, "  accepted steps:         {}", self.accepted_steps)?;
        writeln!(f, "  rejected steps:         {}", self.rejected_steps)?;
        writeln!(f, "  rhs evaluations:        {}", self.rhs_evaluations)?;
        writeln!(
            f,
            "  spectral radius:        {:e} ({} estimates, {} unconverged)",
            self.last_spectral_radius, self.radius_estimates, self.unconverged_estimates
        )?;
        write!(
            f,
            "  stages (last / max):    {} / {}",
            self.last_stages, self.max_stages
        )
    }
}
