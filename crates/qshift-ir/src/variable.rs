//! Variables and transform expressions.
//!
//! A gate angle may depend on named scalar [`Variable`]s either directly or
//! through a small expression tree of [`Transform`] nodes. Each node applies
//! one [`TransformFn`] to an ordered list of argument [`Parameter`]s. Trees
//! are built once and never mutated; there is no sharing between subtrees.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::parameter::Parameter;

/// A named scalar variable together with its current value.
///
/// Two variables are equal when both name and value match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    value: f64,
}

impl Variable {
    /// Create a new variable.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The variable's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's current value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// A copy of this variable holding a different value.
    #[must_use]
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            name: self.name.clone(),
            value,
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

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A user-supplied scalar function usable as a transform.
///
/// Custom functions evaluate like the built-in ones but have no closed-form
/// derivative, so gradients through them are rejected.
#[derive(Clone, Copy)]
pub struct CustomFn {
    name: &'static str,
    arity: usize,
    eval: fn(&[f64]) -> f64,
}

impl CustomFn {
    /// Create a custom function of the given arity.
    pub const fn new(name: &'static str, arity: usize, eval: fn(&[f64]) -> f64) -> Self {
        Self { name, arity, eval }
    }

    /// The function's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for CustomFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFn")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

/// The function applied by a [`Transform`] node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformFn {
    /// `x + y`
    Add,
    /// `x - y`
    Sub,
    /// `x * y`
    Mul,
    /// `x / y`
    Div,
    /// `x ^ y`
    Pow,
    /// `1 / x`
    Inverse,
    /// A user-defined function. Not serializable.
    #[serde(skip)]
    Custom(CustomFn),
}

impl TransformFn {
    /// Name of the function.
    pub fn name(&self) -> &'static str {
        match self {
            TransformFn::Add => "add",
            TransformFn::Sub => "sub",
            TransformFn::Mul => "mul",
            TransformFn::Div => "div",
            TransformFn::Pow => "pow",
            TransformFn::Inverse => "inverse",
            TransformFn::Custom(f) => f.name,
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            TransformFn::Inverse => 1,
            TransformFn::Custom(f) => f.arity,
            _ => 2,
        }
    }

    /// Evaluate the function on concrete argument values.
    ///
    /// Returns NaN when `args` does not match the arity.
    pub fn apply(&self, args: &[f64]) -> f64 {
        match (self, args) {
            (TransformFn::Add, [x, y]) => x + y,
            (TransformFn::Sub, [x, y]) => x - y,
            (TransformFn::Mul, [x, y]) => x * y,
            (TransformFn::Div, [x, y]) => x / y,
            (TransformFn::Pow, [x, y]) => x.powf(*y),
            (TransformFn::Inverse, [x]) => 1.0 / x,
            (TransformFn::Custom(f), args) if args.len() == f.arity => (f.eval)(args),
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An expression node `f(arg_0, ..., arg_{n-1})`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    f: TransformFn,
    args: Vec<Parameter>,
}

impl Transform {
    /// Build a node, checking the argument count against the function arity.
    pub fn new(f: TransformFn, args: Vec<Parameter>) -> IrResult<Self> {
        if args.len() != f.arity() {
            return Err(IrError::ArityMismatch {
                function: f.name().to_string(),
                expected: f.arity(),
                got: args.len(),
            });
        }
        Ok(Self { f, args })
    }

    fn binary(f: TransformFn, x: Parameter, y: Parameter) -> Self {
        Self {
            f,
            args: vec![x, y],
        }
    }

    /// `x + y`
    pub fn add(x: impl Into<Parameter>, y: impl Into<Parameter>) -> Self {
        Self::binary(TransformFn::Add, x.into(), y.into())
    }

    /// `x - y`
    pub fn sub(x: impl Into<Parameter>, y: impl Into<Parameter>) -> Self {
        Self::binary(TransformFn::Sub, x.into(), y.into())
    }

    /// `x * y`
    pub fn mul(x: impl Into<Parameter>, y: impl Into<Parameter>) -> Self {
        Self::binary(TransformFn::Mul, x.into(), y.into())
    }

    /// `x / y`
    pub fn div(x: impl Into<Parameter>, y: impl Into<Parameter>) -> Self {
        Self::binary(TransformFn::Div, x.into(), y.into())
    }

    /// `x ^ y`
    pub fn pow(x: impl Into<Parameter>, y: impl Into<Parameter>) -> Self {
        Self::binary(TransformFn::Pow, x.into(), y.into())
    }

    /// `1 / x`
    pub fn inverse(x: impl Into<Parameter>) -> Self {
        Self {
            f: TransformFn::Inverse,
            args: vec![x.into()],
        }
    }

    /// Apply a custom function to the given arguments.
    pub fn custom(f: CustomFn, args: Vec<Parameter>) -> IrResult<Self> {
        Self::new(TransformFn::Custom(f), args)
    }

    /// The function applied at this node.
    #[inline]
    pub fn function(&self) -> TransformFn {
        self.f
    }

    /// The ordered argument list.
    #[inline]
    pub fn args(&self) -> &[Parameter] {
        &self.args
    }

    /// Current argument values, in argument order.
    pub fn arg_values(&self) -> Vec<f64> {
        self.args.iter().map(Parameter::value).collect()
    }

    /// Evaluate the subtree at the variables' current values.
    pub fn value(&self) -> f64 {
        self.f.apply(&self.arg_values())
    }

    /// Distinct variables reachable from this node, in depth-first order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut found = Vec::new();
        for arg in &self.args {
            arg.collect_variables(&mut found);
        }
        found
    }

    /// Whether `var` (same name and value) occurs anywhere in the subtree.
    pub fn has_var(&self, var: &Variable) -> bool {
        self.args.iter().any(|arg| arg.has_variable(var))
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.f, self.args.as_slice()) {
            (TransformFn::Add, [x, y]) => write!(f, "({x} + {y})"),
            (TransformFn::Sub, [x, y]) => write!(f, "({x} - {y})"),
            (TransformFn::Mul, [x, y]) => write!(f, "({x} * {y})"),
            (TransformFn::Div, [x, y]) => write!(f, "({x} / {y})"),
            (TransformFn::Pow, [x, y]) => write!(f, "({x} ^ {y})"),
            (TransformFn::Inverse, [x]) => write!(f, "(1 / {x})"),
            (func, args) => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
