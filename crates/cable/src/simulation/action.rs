/// Control actions supported by the simulation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration and return the fields so far.
    StopEarly,
}
