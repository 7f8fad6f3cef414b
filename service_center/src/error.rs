use thiserror::Error;

/// Invalid simulation parameters, caught before a run starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("payload range is empty: {low}..={high}")]
    EmptyPayloadRange { low: u16, high: u16 },

    #[error("processing delay range is inverted: {min_ms}ms..={max_ms}ms")]
    InvertedDelayRange { min_ms: u128, max_ms: u128 },

    #[error("maximum queue size must be at least 1")]
    ZeroCapacity,

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("{pending} request(s) still unfinished")]
    Unfinished { pending: usize },
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("invalid arguments: {0}")]
    Usage(String),
}
