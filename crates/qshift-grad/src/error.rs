//! Error types for gradient computation.

use thiserror::Error;

use crate::config::ConfigError;

/// Gradient rules that exist in principle but are not implemented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NotImplementedKind {
    /// Power gates with control qubits.
    #[error("gradient for controlled power gates")]
    ControlledPowerGate,

    /// A power gate whose base is not H, X, Y or Z.
    #[error("unrecognized power gate '{0}', cannot build the gradient")]
    UnrecognizedGateName(String),
}

/// Errors that can occur while building gradients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradError {
    /// Differentiation was attempted on something that is neither a variable
    /// nor a transform.
    #[error("Cannot differentiate {0}; only variables and transforms are allowed")]
    UnsupportedOperandKind(String),

    /// The transform function has no entry in the derivative table.
    #[error("No derivative rule for transform function '{0}'")]
    UnsupportedFunction(String),

    /// The argument position has no entry in the derivative table.
    #[error(
        "No derivative rule for argument {argnum} of '{function}'; only functions with up to two arguments are supported"
    )]
    UnsupportedArity {
        /// Name of the transform function.
        function: String,
        /// Requested argument position.
        argnum: usize,
    },

    /// `grad` was called on something it cannot differentiate.
    #[error("Gradient not implemented for {0}; expected a circuit, a parametrized gate or an objective")]
    UnsupportedArgumentKind(String),

    /// The objective wraps more than one circuit.
    #[error("Gradient of objectives with more than one unitary is not supported yet (got {0})")]
    UnsupportedMultiUnitaryObjective(usize),

    /// An eligible gate is neither a rotation nor a power gate.
    #[error("Automatic differentiation is implemented only for rotation and power gates, got '{0}'")]
    UnsupportedGateKind(String),

    /// The gradient rule for this gate is not implemented.
    #[error("Not implemented: {0}")]
    NotImplemented(#[from] NotImplementedKind),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qshift_ir::IrError),

    /// Gate decomposition failed.
    #[error("Compilation error: {0}")]
    Compile(#[from] qshift_compile::CompileError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for gradient operations.
pub type GradResult<T> = Result<T, GradError>;
