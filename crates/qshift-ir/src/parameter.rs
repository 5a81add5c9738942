//! Gate parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::variable::{Transform, Variable};

/// The parameter of a gate: a plain number, a variable, or a transform tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameter {
    /// A plain numeric value.
    Value(f64),
    /// A single variable.
    Variable(Variable),
    /// An expression over variables.
    Transform(Transform),
}

impl Parameter {
    /// Evaluate at the variables' current values.
    pub fn value(&self) -> f64 {
        match self {
            Parameter::Value(v) => *v,
            Parameter::Variable(var) => var.value(),
            Parameter::Transform(t) => t.value(),
        }
    }

    /// True if the parameter depends on at least one variable.
    pub fn is_parametrized(&self) -> bool {
        match self {
            Parameter::Value(_) => false,
            Parameter::Variable(_) => true,
            Parameter::Transform(t) => !t.variables().is_empty(),
        }
    }

    /// Distinct variables in depth-first discovery order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found
    }

    pub(crate) fn collect_variables(&self, found: &mut Vec<Variable>) {
        match self {
            Parameter::Value(_) => {}
            Parameter::Variable(var) => {
                if !found.contains(var) {
                    found.push(var.clone());
                }
            }
            Parameter::Transform(t) => {
                for arg in t.args() {
                    arg.collect_variables(found);
                }
            }
        }
    }

    /// Whether `var` (same name and value) occurs in this parameter.
    pub fn has_variable(&self, var: &Variable) -> bool {
        match self {
            Parameter::Value(_) => false,
            Parameter::Variable(v) => v == var,
            Parameter::Transform(t) => t.has_var(var),
        }
    }

    /// The variable, if this parameter is a bare variable.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Parameter::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// The transform, if this parameter is an expression.
    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Parameter::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// `self ^ exponent`.
    pub fn pow(self, exponent: impl Into<Parameter>) -> Transform {
        Transform::pow(self, exponent)
    }

    /// `1 / self`.
    pub fn inverse(self) -> Transform {
        Transform::inverse(self)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Value(v) => write!(f, "{v}"),
            Parameter::Variable(var) => f.write_str(var.name()),
            Parameter::Transform(t) => write!(f, "{t}"),
        }
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Value(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Value(f64::from(value))
    }
}

impl From<Variable> for Parameter {
    fn from(var: Variable) -> Self {
        Parameter::Variable(var)
    }
}

impl From<&Variable> for Parameter {
    fn from(var: &Variable) -> Self {
        Parameter::Variable(var.clone())
    }
}

impl From<Transform> for Parameter {
    fn from(t: Transform) -> Self {
        Parameter::Transform(t)
    }
}

/// Arithmetic on expression operands builds [`Transform`] nodes.
macro_rules! impl_transform_ops {
    ($($lhs:ty),*) => {
        $(
            impl<R: Into<Parameter>> std::ops::Add<R> for $lhs {
                type Output = Transform;

                fn add(self, rhs: R) -> Transform {
                    Transform::add(self, rhs)
                }
            }

            impl<R: Into<Parameter>> std::ops::Sub<R> for $lhs {
                type Output = Transform;

                fn sub(self, rhs: R) -> Transform {
                    Transform::sub(self, rhs)
                }
            }

            impl<R: Into<Parameter>> std::ops::Mul<R> for $lhs {
                type Output = Transform;

                fn mul(self, rhs: R) -> Transform {
                    Transform::mul(self, rhs)
                }
            }

            impl<R: Into<Parameter>> std::ops::Div<R> for $lhs {
                type Output = Transform;

                fn div(self, rhs: R) -> Transform {
                    Transform::div(self, rhs)
                }
            }
        )*
    };
}

impl_transform_ops!(Parameter, Variable, Transform);

impl std::ops::Mul<Variable> for f64 {
    type Output = Transform;

    fn mul(self, rhs: Variable) -> Transform {
        Transform::mul(self, rhs)
    }
}

impl std::ops::Mul<Transform> for f64 {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform::mul(self, rhs)
    }
}
