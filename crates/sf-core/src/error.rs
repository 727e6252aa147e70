//! Error types for sizefit

use thiserror::Error;

/// Sizefit error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed configuration or input tables. Fatal at setup, before any
    /// likelihood evaluation happens.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Data that cannot identify the model (e.g. a fitted group observed in
    /// fewer than 2 distinct size classes). Fatal at setup.
    #[error("Degenerate data: {0}")]
    Degenerate(String),

    /// A parameter point produced a non-positive or non-finite bin
    /// probability. This is a rejected-evaluation signal: the calling
    /// optimizer or sampler should discard the proposal, not crash.
    #[error("Invalid likelihood region: {0}")]
    InvalidRegion(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

impl Error {
    /// Whether this error is the rejected-evaluation signal from the
    /// likelihood, as opposed to a genuine failure.
    pub fn is_invalid_region(&self) -> bool {
        matches!(self, Error::InvalidRegion(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
