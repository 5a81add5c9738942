//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while evaluating circuits and objectives.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The objective has no observable to measure.
    #[error("Objective has no observable attached")]
    MissingObservable,

    /// The gate has no statevector implementation.
    #[error("Gate '{0}' is not supported by the statevector simulator")]
    UnsupportedGate(String),

    /// The circuit is too wide to simulate.
    #[error("Circuit needs {needed} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Width required by the circuit and observable.
        needed: u32,
        /// Maximum supported width.
        max: u32,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
