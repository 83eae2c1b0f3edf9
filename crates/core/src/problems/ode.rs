/// Defines an ODE (ordinary differential equation) problem to be integrated.
///
/// An ODE problem is the right-hand side `dy/dt = f(t, y)` of one subsystem,
/// together with its initial condition. Solvers depend only on this trait,
/// never on concrete problem types, so different reaction kinetics can be
/// advanced by the same stepper.
///
/// Problems that read another subsystem's state hold an immutable borrowed
/// view of it (for example `&'a [f64]`) and are rebuilt by the driver whenever
/// that view must be refreshed.
pub trait OdeProblem {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes the derivative of `y` at time `t` into `dydt`.
    ///
    /// `dydt` has the same length as `y`. Implementations must overwrite every
    /// entry and must not depend on its previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error>;

    /// Returns the initial values of the unknowns.
    fn initial_condition(&self) -> Vec<f64>;

    /// Returns an upper bound on the spectral radius of the Jacobian of `f`
    /// at `(t, y)`, if the problem can supply one.
    ///
    /// Solvers configured for an externally supplied spectral radius call this
    /// instead of running their own estimate. The default returns `None`. Only
    /// implement this method if a cheap, reliable bound is known.
    fn spectral_radius(&self, _t: f64, _y: &[f64]) -> Option<f64> {
        None
    }
}
