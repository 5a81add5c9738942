//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use qshift_ir::{Axis, Gate, GateKind, Observable, PauliString};

use crate::error::{SimError, SimResult};

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state with qubit 0 as the lowest bit.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a gate to the statevector.
    pub fn apply(&mut self, gate: &Gate) -> SimResult<()> {
        let matrix = gate_matrix(gate)?;
        let controls: Vec<usize> = gate.controls().iter().map(|q| q.index()).collect();
        self.apply_controlled(gate.target().index(), &controls, &matrix);
        Ok(())
    }

    /// Apply a 2×2 unitary on `target`, conditioned on every control being |1⟩.
    fn apply_controlled(&mut self, target: usize, controls: &[usize], m: &Matrix2) {
        let target_mask = 1 << target;
        let control_mask = controls.iter().fold(0usize, |acc, c| acc | (1 << c));
        for i in 0..self.amplitudes.len() {
            if i & target_mask == 0 && i & control_mask == control_mask {
                let j = i | target_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    /// ⟨ψ|P|ψ⟩ for a Pauli string.
    ///
    /// The string's masks must fit the register, which
    /// [`simulate_circuit`](crate::simulate_circuit) guarantees by sizing the
    /// register to the observable.
    pub fn expectation_pauli(&self, pauli: &PauliString) -> f64 {
        let flip = pauli.flip_mask() as usize;
        let sign = pauli.sign_mask() as usize;
        let y_phase = match pauli.y_count() % 4 {
            0 => ONE,
            1 => I,
            2 => -ONE,
            _ => -I,
        };

        // P|i⟩ = i^{#Y} (-1)^{|i & sign|} |i ^ flip⟩
        let total: Complex64 = self
            .amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| {
                let signed = if (i & sign).count_ones() % 2 == 0 { *amp } else { -*amp };
                self.amplitudes[i ^ flip].conj() * signed
            })
            .sum();
        (y_phase * total).re
    }

    /// ⟨ψ|O|ψ⟩ for a sum of weighted Pauli strings.
    pub fn expectation(&self, observable: &Observable) -> f64 {
        observable
            .terms()
            .iter()
            .map(|term| term.coeff() * self.expectation_pauli(term.string()))
            .sum()
    }
}

/// The 2×2 matrix a gate applies to its target.
fn gate_matrix(gate: &Gate) -> SimResult<Matrix2> {
    let theta = gate.angle();
    match gate.kind() {
        GateKind::Rotation(axis) => Ok(rotation_matrix(*axis, theta)),
        GateKind::Phase => Ok([[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]),
        GateKind::Power(name) => {
            let base = involution(name).ok_or_else(|| SimError::UnsupportedGate(name.clone()))?;
            Ok(power_matrix(&base, theta))
        }
    }
}

fn rotation_matrix(axis: Axis, theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = (theta / 2.0).sin();
    match axis {
        Axis::X => {
            let neg_i_s = Complex64::new(0.0, -s);
            [[c, neg_i_s], [neg_i_s, c]]
        }
        Axis::Y => {
            let s = Complex64::new(s, 0.0);
            [[c, -s], [s, c]]
        }
        Axis::Z => [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ],
    }
}

/// Base matrix of a power gate. All supported bases square to the identity.
fn involution(name: &str) -> Option<Matrix2> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    match name {
        "H" | "Hadamard" => Some([[h, h], [h, -h]]),
        "X" | "x" => Some([[ZERO, ONE], [ONE, ZERO]]),
        "Y" | "y" => Some([[ZERO, -I], [I, ZERO]]),
        "Z" | "z" => Some([[ONE, ZERO], [ZERO, -ONE]]),
        _ => None,
    }
}

/// `U^p = (I + U)/2 + e^{iπp} (I - U)/2` for an involution `U`.
fn power_matrix(u: &Matrix2, p: f64) -> Matrix2 {
    let phase = Complex64::from_polar(1.0, PI * p);
    let mut m = [[ZERO; 2]; 2];
    for (r, row) in m.iter_mut().enumerate() {
        for (c, entry) in row.iter_mut().enumerate() {
            let id = if r == c { ONE } else { ZERO };
            *entry = (id + u[r][c]) * 0.5 + phase * (id - u[r][c]) * 0.5;
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use qshift_ir::{Pauli, QubitId};
    use std::f64::consts::FRAC_PI_2;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert_eq!(sv.num_qubits(), 2);
        assert!(approx_eq(sv.amplitudes[0], ONE));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], ZERO));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::h(QubitId(0))).unwrap();

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::h(QubitId(0))).unwrap();
        sv.apply(&Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(FRAC_1_SQRT_2, 0.0)));

        for (pauli, expected) in [(Pauli::Z, 1.0), (Pauli::X, 1.0), (Pauli::Y, -1.0)] {
            let pp = PauliString::from_ops([(QubitId(0), pauli), (QubitId(1), pauli)]).unwrap();
            assert!((sv.expectation_pauli(&pp) - expected).abs() < 1e-12, "{pp}");
        }
        let zi = PauliString::single(QubitId(0), Pauli::Z).unwrap();
        assert!(sv.expectation_pauli(&zi).abs() < 1e-12);
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::x(QubitId(0))).unwrap();

        assert!(approx_eq(sv.amplitudes[0], ZERO));
        assert!(approx_eq(sv.amplitudes[1], ONE));
    }

    #[test]
    fn test_rotation_expectations() {
        let theta: f64 = 0.8;
        for (gate, pauli, expected) in [
            (Gate::rx(QubitId(0), theta), Pauli::Z, theta.cos()),
            (Gate::rx(QubitId(0), theta), Pauli::Y, -theta.sin()),
            (Gate::ry(QubitId(0), theta), Pauli::Z, theta.cos()),
            (Gate::ry(QubitId(0), theta), Pauli::X, theta.sin()),
        ] {
            let mut sv = Statevector::new(1);
            sv.apply(&gate).unwrap();
            let value = sv.expectation_pauli(&PauliString::single(QubitId(0), pauli).unwrap());
            assert!((value - expected).abs() < 1e-12, "{gate}: {value} vs {expected}");
        }
    }

    #[test]
    fn test_power_gates() {
        // X^1 and X^0 are X and identity.
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::power("X", QubitId(0), 1.0)).unwrap();
        assert!(approx_eq(sv.amplitudes[1], ONE));

        let mut sv = Statevector::new(1);
        sv.apply(&Gate::power("X", QubitId(0), 0.0)).unwrap();
        assert!(approx_eq(sv.amplitudes[0], ONE));

        // X^0.5 twice equals X.
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::power("X", QubitId(0), 0.5)).unwrap();
        sv.apply(&Gate::power("X", QubitId(0), 0.5)).unwrap();
        assert!(approx_eq(sv.amplitudes[0], ZERO));
        assert!(approx_eq(sv.amplitudes[1], ONE));

        // <Z> after X^p is cos(πp).
        let p = 0.3;
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::power("X", QubitId(0), p)).unwrap();
        let z = sv.expectation(&Observable::z(QubitId(0)).unwrap());
        assert!((z - (PI * p).cos()).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_power_gate() {
        let mut sv = Statevector::new(1);
        let err = sv.apply(&Gate::power("T", QubitId(0), 1.0));
        assert!(matches!(err, Err(SimError::UnsupportedGate(name)) if name == "T"));
    }

    #[test]
    fn test_controlled_rotation_respects_control() {
        let gate = Gate::ry(QubitId(1), PI).with_controls([QubitId(0)]).unwrap();

        let mut sv = Statevector::new(2);
        sv.apply(&gate).unwrap();
        assert!((sv.expectation(&Observable::z(QubitId(1)).unwrap()) - 1.0).abs() < 1e-12);

        let mut sv = Statevector::new(2);
        sv.apply(&Gate::x(QubitId(0))).unwrap();
        sv.apply(&gate).unwrap();
        assert!((sv.expectation(&Observable::z(QubitId(1)).unwrap()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_observable() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::x(QubitId(1))).unwrap();
        let obs: Observable = "0.5 Z0 + 2 Z1 + -1 Z0 Z1".parse().unwrap();
        assert!((sv.expectation(&obs) - (0.5 - 2.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_mixed_string_phase() {
        // Ry(π/2) on q0 and Rx(-π/2) on q1 give <X0> = 1 and <Y1> = 1.
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::ry(QubitId(0), FRAC_PI_2)).unwrap();
        sv.apply(&Gate::rx(QubitId(1), -FRAC_PI_2)).unwrap();
        let xy = PauliString::from_ops([(QubitId(0), Pauli::X), (QubitId(1), Pauli::Y)]).unwrap();
        assert!((sv.expectation_pauli(&xy) - 1.0).abs() < 1e-12);
        let yx = PauliString::from_ops([(QubitId(0), Pauli::Y), (QubitId(1), Pauli::X)]).unwrap();
        assert!(sv.expectation_pauli(&yx).abs() < 1e-12);
    }
}
