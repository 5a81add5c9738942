//! Chain-rule differentiation of gate parameter expressions.
//!
//! [`weight_chain`] computes ∂(expr)/∂(var) for a [`Parameter`] built from
//! variables and transforms. Each transform node contributes
//!
//!   Σ_i  ∂f/∂a_i (a_0, …, a_{n-1}) · ∂a_i/∂var
//!
//! where the closed-form partials ∂f/∂a_i come from [`tgrad`]. Expression
//! trees have no shared subexpressions, so plain recursion is exact.

use qshift_ir::{Parameter, TransformFn, Variable};
use tracing::trace;

use crate::error::{GradError, GradResult};

/// A closed-form partial derivative, evaluated on the transform's argument
/// values.
pub type PartialDerivative = fn(&[f64]) -> f64;

#[inline]
fn arg(args: &[f64], i: usize) -> f64 {
    args.get(i).copied().unwrap_or(f64::NAN)
}

/// Partial derivative of `f` with respect to its argument `argnum`.
///
/// Only the built-in transform functions have derivative rules, and only for
/// argument positions 0 and 1.
pub fn tgrad(f: TransformFn, argnum: usize) -> GradResult<PartialDerivative> {
    let unsupported_arity = || GradError::UnsupportedArity {
        function: f.name().to_string(),
        argnum,
    };

    let partial: PartialDerivative = match (argnum, f) {
        (0, TransformFn::Add) => |_| 1.0,
        (0, TransformFn::Sub) => |_| 1.0,
        (0, TransformFn::Mul) => |a| arg(a, 1),
        (0, TransformFn::Div) => |a| 1.0 / arg(a, 1),
        (0, TransformFn::Pow) => |a| {
            let (x, y) = (arg(a, 0), arg(a, 1));
            y * x.powf(y - 1.0)
        },
        (0, TransformFn::Inverse) => |a| -1.0 / arg(a, 0).powi(2),

        (1, TransformFn::Add) => |_| 1.0,
        (1, TransformFn::Sub) => |_| -1.0,
        (1, TransformFn::Mul) => |a| arg(a, 0),
        (1, TransformFn::Div) => |a| {
            let (x, y) = (arg(a, 0), arg(a, 1));
            -x / y.powi(2)
        },
        (1, TransformFn::Pow) => |a| {
            let (x, y) = (arg(a, 0), arg(a, 1));
            x.powf(y) * x.ln()
        },
        (1, TransformFn::Inverse) => return Err(unsupported_arity()),

        (0 | 1, TransformFn::Custom(custom)) => {
            return Err(GradError::UnsupportedFunction(custom.name().to_string()));
        }
        _ => return Err(unsupported_arity()),
    };
    Ok(partial)
}

/// ∂(expr)/∂(var) at the variables' current values.
///
/// A bare variable differentiates to 1 if it equals `var` (same name and
/// value) and to 0 otherwise. Arguments of a transform that do not contain
/// `var` contribute nothing.
pub fn weight_chain(expr: &Parameter, var: &Variable) -> GradResult<f64> {
    match expr {
        Parameter::Variable(v) => Ok(if v == var { 1.0 } else { 0.0 }),
        Parameter::Transform(t) => {
            let values = t.arg_values();
            let mut total = 0.0;
            for (argnum, a) in t.args().iter().enumerate() {
                if !a.has_variable(var) {
                    continue;
                }
                let partial = tgrad(t.function(), argnum)?;
                total += partial(&values) * weight_chain(a, var)?;
            }
            trace!(expr = %t, var = var.name(), value = total, "chain rule");
            Ok(total)
        }
        Parameter::Value(v) => Err(GradError::UnsupportedOperandKind(format!(
            "numeric value {v}"
        ))),
    }
}
