//! Gate-sequence circuits.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Axis, Gate};
use crate::parameter::Parameter;
use crate::qubit::QubitId;
use crate::variable::Variable;

/// An ordered sequence of gates with a scalar weight.
///
/// The weight scales the circuit's expectation value when it appears as a
/// term of an [`Objective`](crate::Objective). Circuits built by the
/// builder methods start with weight 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    gates: Vec<Gate>,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self {
            gates: vec![],
            weight: default_weight(),
        }
    }

    /// Create a circuit from a gate sequence.
    pub fn from_gates(gates: impl IntoIterator<Item = Gate>) -> Self {
        Self {
            gates: gates.into_iter().collect(),
            weight: default_weight(),
        }
    }

    /// A one-gate circuit.
    pub fn wrap_gate(gate: Gate) -> Self {
        Self::from_gates([gate])
    }

    /// Append a gate.
    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Gate::h(qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Gate::x(qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Gate::y(qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Gate::z(qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: impl Into<Parameter>, qubit: QubitId) -> &mut Self {
        self.push(Gate::rx(qubit, theta))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: impl Into<Parameter>, qubit: QubitId) -> &mut Self {
        self.push(Gate::ry(qubit, theta))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: impl Into<Parameter>, qubit: QubitId) -> &mut Self {
        self.push(Gate::rz(qubit, theta))
    }

    /// Apply a named gate raised to `exponent`.
    pub fn power(
        &mut self,
        name: impl Into<String>,
        exponent: impl Into<Parameter>,
        qubit: QubitId,
    ) -> &mut Self {
        self.push(Gate::power(name, qubit, exponent))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: impl Into<Parameter>, qubit: QubitId) -> &mut Self {
        self.push(Gate::phase(qubit, theta))
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        Ok(self.push(Gate::cnot(control, target)?))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        Ok(self.push(Gate::cz(control, target)?))
    }

    /// Apply a singly-controlled rotation.
    pub fn crot(
        &mut self,
        axis: Axis,
        theta: impl Into<Parameter>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let gate = Gate::rotation(axis, target, theta).with_controls([control])?;
        Ok(self.push(gate))
    }

    /// Apply controlled Rx.
    pub fn crx(
        &mut self,
        theta: impl Into<Parameter>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.crot(Axis::X, theta, control, target)
    }

    /// Apply controlled Ry.
    pub fn cry(
        &mut self,
        theta: impl Into<Parameter>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.crot(Axis::Y, theta, control, target)
    }

    /// Apply controlled Rz.
    pub fn crz(
        &mut self,
        theta: impl Into<Parameter>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.crot(Axis::Z, theta, control, target)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The gate sequence.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the circuit has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Width of the circuit: one past the highest qubit index used.
    pub fn num_qubits(&self) -> u32 {
        self.gates
            .iter()
            .flat_map(|g| g.qubits())
            .map(|q| q.0 + 1)
            .max()
            .unwrap_or(0)
    }

    /// The circuit weight.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Return this circuit with its weight set to `weight`.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Distinct variables of the non-frozen gates, in order of first use.
    pub fn parameters(&self) -> Vec<Variable> {
        let mut seen = FxHashSet::default();
        let mut variables = Vec::new();
        for gate in self.gates.iter().filter(|g| !g.is_frozen()) {
            for var in gate.parameter().variables() {
                // `+ 0.0` folds -0.0 into 0.0, matching `Variable`'s `==`.
                let value = var.value() + 0.0;
                if seen.insert((var.name().to_string(), value.to_bits())) {
                    variables.push(var);
                }
            }
        }
        variables
    }

    /// A new circuit with the gate at `position` replaced by `gates`.
    ///
    /// All other gates keep their order; the weight is carried over.
    pub fn replace_gate(
        &self,
        position: usize,
        gates: impl IntoIterator<Item = Gate>,
    ) -> IrResult<Circuit> {
        if position >= self.gates.len() {
            return Err(IrError::GatePositionOutOfRange {
                position,
                len: self.gates.len(),
            });
        }
        let mut replaced = Vec::with_capacity(self.gates.len());
        replaced.extend_from_slice(&self.gates[..position]);
        replaced.extend(gates);
        replaced.extend_from_slice(&self.gates[position + 1..]);
        Ok(Circuit {
            gates: replaced,
            weight: self.weight,
        })
    }
}

impl FromIterator<Gate> for Circuit {
    fn from_iter<T: IntoIterator<Item = Gate>>(iter: T) -> Self {
        Self::from_gates(iter)
    }
}
