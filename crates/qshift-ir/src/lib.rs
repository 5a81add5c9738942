//! qshift circuit representation
//!
//! This crate provides the data model shared by the qshift crates: the
//! variables and expression trees that gate angles are built from, the gates
//! and circuits themselves, and the objectives that combine weighted circuits
//! with an observable.
//!
//! # Core Components
//!
//! - **Variables**: [`Variable`] leaves and [`Transform`] nodes over the
//!   functions in [`TransformFn`]
//! - **Parameters**: [`Parameter`], a gate angle that is a number, a variable,
//!   or a transform
//! - **Gates**: [`Gate`] with a [`GateKind`] (rotation, power or phase), a
//!   target, optional controls and a frozen flag
//! - **Circuit**: [`Circuit`], an ordered gate sequence with a weight
//! - **Objective**: [`Objective`], weighted circuits plus an [`Observable`]
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qshift_ir::{Circuit, QubitId, Variable};
//!
//! let a = Variable::new("a", 0.3);
//! let b = Variable::new("b", 1.2);
//!
//! let mut circuit = Circuit::new();
//! circuit
//!     .h(QubitId(0))
//!     .ry(a.clone(), QubitId(0))
//!     .rz(a.clone() * b.clone(), QubitId(1));
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.parameters(), vec![a, b]);
//! assert_eq!(circuit.num_qubits(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod objective;
pub mod observable;
pub mod parameter;
pub mod qubit;
pub mod variable;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Axis, Gate, GateKind, power_rotation_angle};
pub use objective::Objective;
pub use observable::{OBSERVABLE_QUBIT_LIMIT, Observable, Pauli, PauliString, PauliTerm};
pub use parameter::Parameter;
pub use qubit::QubitId;
pub use variable::{CustomFn, Transform, TransformFn, Variable};
