//! Exact evaluation of circuits and objectives.

use qshift_ir::{Circuit, Objective, Observable};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Widest circuit the statevector engine accepts.
pub const MAX_QUBITS: u32 = 24;

/// Expectation value of `observable` in the state `circuit` prepares from |0…0⟩.
///
/// The circuit's weight is not applied.
pub fn simulate_circuit(circuit: &Circuit, observable: &Observable) -> SimResult<f64> {
    let width = circuit.num_qubits().max(observable.width());
    if width > MAX_QUBITS {
        return Err(SimError::TooManyQubits {
            needed: width,
            max: MAX_QUBITS,
        });
    }

    let mut state = Statevector::new(width as usize);
    for gate in circuit.gates() {
        state.apply(gate)?;
    }
    Ok(state.expectation(observable))
}

/// Weighted sum of the objective's circuit expectation values.
pub fn simulate_objective(objective: &Objective) -> SimResult<f64> {
    let observable = objective.observable().ok_or(SimError::MissingObservable)?;
    debug!(
        circuits = objective.len(),
        terms = observable.len(),
        "evaluating objective"
    );

    let mut total = 0.0;
    for circuit in objective.unitaries() {
        total += circuit.weight() * simulate_circuit(circuit, observable)?;
    }
    Ok(total)
}
