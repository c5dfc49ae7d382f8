/// Rejected experiment parameters. Raised before any run starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("slot budget must be positive")]
    ZeroSlots,
    #[error("population size must be positive")]
    ZeroPopulation,
    #[error("population range {start}..={end} is empty")]
    EmptyPopulationRange { start: usize, end: usize },
    #[error("backoff window must be positive")]
    ZeroWindow,
    #[error("no backoff windows configured")]
    NoWindows,
    #[error("backlog model needs at least one node")]
    ZeroNodes,
    #[error("{name} = {value} is not a probability")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("no retransmission probabilities configured")]
    NoRetransmissionProbabilities,
    #[error("total arrival rate must be non-negative and finite, got {0}")]
    InvalidArrivalRate(f64),
    #[error("arrival sweep needs a non-negative start, a positive step and at least one point")]
    InvalidArrivalSweep,
}

/// Failure while solving the backlog chain for one parameter point.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    #[error("backlog state {n} is outside 0..={m}")]
    StateOutOfRange { n: usize, m: usize },
    #[error("transition from backlog {n} down to {n}-1 is {value:e}, too small to divide by")]
    SingularTransition { n: usize, value: f64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlohaError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Compute(#[from] ComputeError),
}
