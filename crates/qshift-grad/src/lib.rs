//! Parameter-shift gradients for qshift circuits.
//!
//! The gradient of a circuit with respect to its variables is itself a list
//! of objectives, one per variable. Each objective is a weighted collection
//! of shifted copies of the original circuit; evaluating it and summing with
//! the weights yields the partial derivative of the expectation value.
//!
//! # Example
//!
//! ```rust
//! use qshift_grad::grad;
//! use qshift_ir::{Circuit, Objective, Observable, QubitId, Variable};
//!
//! let theta = Variable::new("theta", 0.4);
//! let mut circuit = Circuit::new();
//! circuit.ry(theta.clone(), QubitId(0));
//!
//! let objective = Objective::expectation(circuit, Observable::z(QubitId(0)).unwrap());
//! let gradient = grad(&objective).unwrap();
//!
//! // One component for theta, made of two shifted circuits.
//! assert_eq!(gradient.len(), 1);
//! assert_eq!(gradient[0].weights(), vec![0.5, -0.5]);
//! ```
//!
//! # Features
//!
//! - `rayon` (default): compute the per-variable components in parallel when
//!   [`GradientConfig::parallel`](config::GradientConfig) is enabled.

pub mod chain;
pub mod config;
pub mod error;
pub mod gradient;

pub use chain::{PartialDerivative, tgrad, weight_chain};
pub use config::{ConfigError, GradientConfig};
pub use error::{GradError, GradResult, NotImplementedKind};
pub use gradient::{
    GradTarget, grad, grad_objective, grad_objective_with, grad_unitary, grad_unitary_with,
    grad_with, grad_with_config_file, make_gradient_component,
};
