//! Error types for the compile crate.

use thiserror::Error;

/// Errors that can occur while decomposing gates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The gate is not a rotation.
    #[error("Gate '{0}' is not a rotation gate")]
    NotARotation(String),

    /// The rotation has no control qubit to decompose.
    #[error("Gate '{0}' has no control qubits")]
    NotControlled(String),

    /// Only singly-controlled rotations can be decomposed.
    #[error("Gate '{gate_name}' has {count} control qubits; only one is supported")]
    UnsupportedControlCount {
        /// Name of the gate.
        gate_name: String,
        /// Number of controls found.
        count: usize,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qshift_ir::IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
