//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Duplicate qubit in a gate's operands.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A transform was built with the wrong number of arguments.
    #[error("Transform '{function}' takes {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Name of the transform function.
        function: String,
        /// Arity of the function.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },

    /// Gate position does not exist in the circuit.
    #[error("Gate position {position} out of range for circuit with {len} gates")]
    GatePositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of gates in the circuit.
        len: usize,
    },

    /// A Pauli factor addresses a qubit beyond what observables can hold.
    #[error("Qubit {qubit} out of range; observables support qubits below {limit}")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Exclusive upper bound on qubit indices.
        limit: u32,
    },

    /// An observable could not be parsed from text.
    #[error("Invalid observable: {0}")]
    InvalidObservable(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
