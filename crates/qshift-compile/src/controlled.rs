//! Decomposition of controlled rotations.
//!
//! A singly-controlled rotation `C-R_a(θ)` is rewritten as
//!
//!   R_a(α) · E · R_a(β) · E
//!
//! on the target, where `E` is an entangler controlled by the original
//! control qubit and chosen to anticommute with the rotation generator:
//! CNOT for the Y and Z axes, CZ for the X axis. With the control in |0⟩ the
//! sequence is `R_a(α + β)`, with the control in |1⟩ it is `R_a(α - β)`.
//! Choosing `(α, β) = (θ/2, -θ/2)` therefore reproduces `C-R_a(θ)` exactly.
//!
//! Other `(α, β)` pairs are used by the gradient builder to shift each half
//! of the decomposition independently.

use qshift_ir::{Axis, Gate, GateKind};
use tracing::trace;

use crate::error::{CompileError, CompileResult};

/// The angle pair `(θ/2, -θ/2)` that reproduces the controlled rotation.
pub fn default_angles(gate: &Gate) -> [f64; 2] {
    let half = gate.angle() / 2.0;
    [half, -half]
}

/// Decompose a singly-controlled rotation using the given angle pair.
///
/// The emitted rotations are frozen: they carry plain numeric angles and are
/// never differentiated again.
pub fn compile_controlled_rotation(gate: &Gate, angles: [f64; 2]) -> CompileResult<Vec<Gate>> {
    let GateKind::Rotation(axis) = gate.kind() else {
        return Err(CompileError::NotARotation(gate.name().to_string()));
    };
    let control = match gate.controls() {
        [] => return Err(CompileError::NotControlled(gate.name().to_string())),
        [control] => *control,
        controls => {
            return Err(CompileError::UnsupportedControlCount {
                gate_name: gate.name().to_string(),
                count: controls.len(),
            });
        }
    };
    let target = gate.target();

    let entangler = match axis {
        Axis::X => Gate::cz(control, target)?,
        Axis::Y | Axis::Z => Gate::cnot(control, target)?,
    };

    trace!(
        gate = %gate,
        alpha = angles[0],
        beta = angles[1],
        "decomposing controlled rotation"
    );

    Ok(vec![
        Gate::rotation(*axis, target, angles[0]).frozen(),
        entangler.clone(),
        Gate::rotation(*axis, target, angles[1]).frozen(),
        entangler,
    ])
}
