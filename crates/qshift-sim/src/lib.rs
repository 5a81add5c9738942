//! qshift statevector evaluation engine
//!
//! Evaluates [`Objective`](qshift_ir::Objective)s exactly: every circuit is
//! run on a dense statevector, the observable's expectation value is taken,
//! and the results are summed with the circuit weights. Statevector
//! simulation is exact but limited to small widths (see [`MAX_QUBITS`]).
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```rust
//! use qshift_ir::{Circuit, Objective, Observable, QubitId};
//! use qshift_sim::simulate_objective;
//!
//! let mut circuit = Circuit::new();
//! circuit.rx(std::f64::consts::PI, QubitId(0));
//!
//! let objective = Objective::expectation(circuit, Observable::z(QubitId(0)).unwrap());
//! let value = simulate_objective(&objective).unwrap();
//! assert!((value + 1.0).abs() < 1e-12);
//! ```

pub mod error;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use simulator::{MAX_QUBITS, simulate_circuit, simulate_objective};
pub use statevector::Statevector;
