/// Outcome of a successful call to `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Steps were taken and the end time has not been reached.
    Continue,

    /// The state's time has reached or passed its end time.
    Finished,
}
