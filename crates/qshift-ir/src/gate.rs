//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::parameter::Parameter;
use crate::qubit::QubitId;

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Pauli-X axis (code 0).
    X,
    /// Pauli-Y axis (code 1).
    Y,
    /// Pauli-Z axis (code 2).
    Z,
}

impl Axis {
    /// Numeric axis code: X=0, Y=1, Z=2.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis from its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// What a gate does with its parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// `exp(-i θ/2 σ_axis)`; the expectation value is sinusoidal in θ.
    Rotation(Axis),
    /// A named involutory gate (H, X, Y, Z) raised to a real exponent.
    ///
    /// Fixed gates such as X or CNOT are power gates with exponent 1.
    Power(String),
    /// Phase gate `diag(1, e^{iθ})`.
    Phase,
}

/// A gate acting on one target qubit, optionally controlled.
///
/// Gates are immutable once built. Shifted variants used for gradients are
/// new values created with [`Gate::shifted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    target: QubitId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    controls: Vec<QubitId>,
    parameter: Parameter,
    #[serde(default)]
    frozen: bool,
}

impl Gate {
    /// Create an uncontrolled, non-frozen gate.
    pub fn new(kind: GateKind, target: QubitId, parameter: impl Into<Parameter>) -> Self {
        Self {
            kind,
            target,
            controls: vec![],
            parameter: parameter.into(),
            frozen: false,
        }
    }

    /// Rotation about `axis`.
    pub fn rotation(axis: Axis, target: QubitId, angle: impl Into<Parameter>) -> Self {
        Self::new(GateKind::Rotation(axis), target, angle)
    }

    /// Rotation about X.
    pub fn rx(target: QubitId, angle: impl Into<Parameter>) -> Self {
        Self::rotation(Axis::X, target, angle)
    }

    /// Rotation about Y.
    pub fn ry(target: QubitId, angle: impl Into<Parameter>) -> Self {
        Self::rotation(Axis::Y, target, angle)
    }

    /// Rotation about Z.
    pub fn rz(target: QubitId, angle: impl Into<Parameter>) -> Self {
        Self::rotation(Axis::Z, target, angle)
    }

    /// Named gate raised to `exponent`.
    pub fn power(name: impl Into<String>, target: QubitId, exponent: impl Into<Parameter>) -> Self {
        Self::new(GateKind::Power(name.into()), target, exponent)
    }

    /// Hadamard gate.
    pub fn h(target: QubitId) -> Self {
        Self::power("H", target, 1.0)
    }

    /// Pauli-X gate.
    pub fn x(target: QubitId) -> Self {
        Self::power("X", target, 1.0)
    }

    /// Pauli-Y gate.
    pub fn y(target: QubitId) -> Self {
        Self::power("Y", target, 1.0)
    }

    /// Pauli-Z gate.
    pub fn z(target: QubitId) -> Self {
        Self::power("Z", target, 1.0)
    }

    /// Controlled-NOT.
    pub fn cnot(control: QubitId, target: QubitId) -> IrResult<Self> {
        Self::x(target).with_controls([control])
    }

    /// Controlled-Z.
    pub fn cz(control: QubitId, target: QubitId) -> IrResult<Self> {
        Self::z(target).with_controls([control])
    }

    /// Phase gate.
    pub fn phase(target: QubitId, angle: impl Into<Parameter>) -> Self {
        Self::new(GateKind::Phase, target, angle)
    }

    /// Add control qubits.
    ///
    /// Fails if a control coincides with the target or another control.
    pub fn with_controls(mut self, controls: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        for control in controls {
            if control == self.target || self.controls.contains(&control) {
                return Err(IrError::DuplicateQubit {
                    qubit: control,
                    gate_name: Some(self.name().to_string()),
                });
            }
            self.controls.push(control);
        }
        Ok(self)
    }

    /// Mark the gate as frozen: it is treated as a constant when differentiating.
    #[must_use]
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// A frozen copy of this gate with its parameter replaced by `angle`.
    #[must_use]
    pub fn shifted(&self, angle: f64) -> Self {
        Self {
            kind: self.kind.clone(),
            target: self.target,
            controls: self.controls.clone(),
            parameter: Parameter::Value(angle),
            frozen: true,
        }
    }

    /// The gate kind.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Short name: `Rx`/`Ry`/`Rz`, the power gate's name, or `P`.
    pub fn name(&self) -> &str {
        match &self.kind {
            GateKind::Rotation(Axis::X) => "Rx",
            GateKind::Rotation(Axis::Y) => "Ry",
            GateKind::Rotation(Axis::Z) => "Rz",
            GateKind::Power(name) => name.as_str(),
            GateKind::Phase => "P",
        }
    }

    /// Target qubit.
    #[inline]
    pub fn target(&self) -> QubitId {
        self.target
    }

    /// Control qubits.
    #[inline]
    pub fn controls(&self) -> &[QubitId] {
        &self.controls
    }

    /// All qubits the gate touches, controls first.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls.iter().copied().chain(std::iter::once(self.target))
    }

    /// The gate parameter (angle or exponent).
    #[inline]
    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    /// Current numeric value of the parameter.
    pub fn angle(&self) -> f64 {
        self.parameter.value()
    }

    /// Whether the gate is excluded from differentiation.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the gate has control qubits.
    #[inline]
    pub fn is_controlled(&self) -> bool {
        !self.controls.is_empty()
    }

    /// Whether the parameter depends on a variable.
    pub fn is_parametrized(&self) -> bool {
        self.parameter.is_parametrized()
    }

    /// Whether this is a rotation gate.
    pub fn is_rotation(&self) -> bool {
        matches!(self.kind, GateKind::Rotation(_))
    }

    /// Whether this is a power gate.
    pub fn is_power(&self) -> bool {
        matches!(self.kind, GateKind::Power(_))
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_controlled() {
            f.write_str("C")?;
        }
        match &self.kind {
            GateKind::Power(_) => write!(f, "{}^({})", self.name(), self.parameter)?,
            _ => write!(f, "{}({})", self.name(), self.parameter)?,
        }
        for control in &self.controls {
            write!(f, " {control}")?;
        }
        write!(f, " {}", self.target)
    }
}

/// Angle of the rotation equivalent to a power gate with exponent `p`.
///
/// X/Y/Z powers map to `p·π`; the Hadamard power maps to `p·π/4` about Y.
pub fn power_rotation_angle(name: &str, exponent: f64) -> Option<(Axis, f64)> {
    match name {
        "H" | "Hadamard" => Some((Axis::Y, exponent * PI / 4.0)),
        "X" | "x" => Some((Axis::X, exponent * PI)),
        "Y" | "y" => Some((Axis::Y, exponent * PI)),
        "Z" | "z" => Some((Axis::Z, exponent * PI)),
        _ => None,
    }
}
