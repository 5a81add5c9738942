//! Observables measured by an [`Objective`](crate::Objective).
//!
//! An [`Observable`] is a real linear combination of Pauli strings. Each
//! [`PauliString`] is kept in symplectic form: one bit mask for the qubits
//! carrying an X component and one for the qubits carrying a Z component
//! (Y sets both). For a basis state `|i⟩` this gives
//!
//!   P |i⟩ = i^{#Y} · (-1)^{popcount(i & z)} · |i ^ x⟩
//!
//! which is all an evaluation engine needs to compute ⟨ψ|P|ψ⟩ without
//! building matrices.
//!
//! Observables can be written as text, one term per `+`, each term an
//! optional coefficient followed by Pauli factors:
//!
//! ```rust
//! use qshift_ir::{Observable, Pauli, QubitId};
//!
//! let obs: Observable = "-1.0 Z0 Z1 + 0.5 X0".parse().unwrap();
//! assert_eq!(obs.len(), 2);
//! assert_eq!(obs.width(), 2);
//! assert_eq!(obs.terms()[0].string().get(QubitId(1)), Pauli::Z);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Qubits an observable can address: indices `0..OBSERVABLE_QUBIT_LIMIT`.
pub const OBSERVABLE_QUBIT_LIMIT: u32 = u64::BITS;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// `(x, z)` components in symplectic form.
    fn components(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }

    fn from_components(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    fn symbol(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// A tensor product of Pauli operators; qubits not mentioned carry `I`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    x: u64,
    z: u64,
}

impl PauliString {
    /// The identity string.
    pub const IDENTITY: PauliString = PauliString { x: 0, z: 0 };

    /// Build from `(qubit, pauli)` factors.
    ///
    /// Identity factors are ignored. A qubit named twice, or one at or above
    /// [`OBSERVABLE_QUBIT_LIMIT`], is an error.
    pub fn from_ops(ops: impl IntoIterator<Item = (QubitId, Pauli)>) -> IrResult<Self> {
        let mut string = Self::IDENTITY;
        for (qubit, pauli) in ops {
            if pauli == Pauli::I {
                continue;
            }
            let bit = qubit_bit(qubit)?;
            if string.support() & bit != 0 {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: None,
                });
            }
            let (x, z) = pauli.components();
            if x {
                string.x |= bit;
            }
            if z {
                string.z |= bit;
            }
        }
        Ok(string)
    }

    /// A single non-trivial factor.
    pub fn single(qubit: QubitId, pauli: Pauli) -> IrResult<Self> {
        Self::from_ops([(qubit, pauli)])
    }

    /// The factor acting on `qubit`.
    pub fn get(&self, qubit: QubitId) -> Pauli {
        match qubit_bit(qubit) {
            Ok(bit) => Pauli::from_components(self.x & bit != 0, self.z & bit != 0),
            Err(_) => Pauli::I,
        }
    }

    /// Non-identity factors in ascending qubit order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        (0..OBSERVABLE_QUBIT_LIMIT)
            .filter(|q| (self.support() >> q) & 1 == 1)
            .map(|q| (QubitId(q), self.get(QubitId(q))))
    }

    /// Qubits whose basis bit is flipped (X or Y factors).
    #[inline]
    pub fn flip_mask(&self) -> u64 {
        self.x
    }

    /// Qubits that contribute a `(-1)^bit` sign (Z or Y factors).
    #[inline]
    pub fn sign_mask(&self) -> u64 {
        self.z
    }

    /// Number of Y factors; the string carries an overall `i^count`.
    #[inline]
    pub fn y_count(&self) -> u32 {
        (self.x & self.z).count_ones()
    }

    /// Qubits with a non-identity factor.
    #[inline]
    fn support(&self) -> u64 {
        self.x | self.z
    }

    /// True for the identity string.
    pub fn is_identity(&self) -> bool {
        self.support() == 0
    }

    /// True if the string is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.x == 0
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> u32 {
        self.support().count_ones()
    }

    /// Qubits needed to hold the string (highest index + 1).
    pub fn width(&self) -> u32 {
        u64::BITS - self.support().leading_zeros()
    }
}

fn qubit_bit(qubit: QubitId) -> IrResult<u64> {
    1u64.checked_shl(qubit.0).ok_or(IrError::QubitOutOfRange {
        qubit,
        limit: OBSERVABLE_QUBIT_LIMIT,
    })
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("I");
        }
        for (i, (qubit, pauli)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", pauli.symbol(), qubit.0)?;
        }
        Ok(())
    }
}

/// One weighted string of an observable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    coeff: f64,
    string: PauliString,
}

impl PauliTerm {
    pub fn new(coeff: f64, string: PauliString) -> Self {
        Self { coeff, string }
    }

    #[inline]
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    #[inline]
    pub fn string(&self) -> &PauliString {
        &self.string
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.string.is_identity() {
            write!(f, "{}", self.coeff)
        } else {
            write!(f, "{} {}", self.coeff, self.string)
        }
    }
}

/// A Hermitian observable `Σ_k c_k P_k`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    terms: Vec<PauliTerm>,
}

impl Observable {
    /// The zero observable.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Z` on a single qubit.
    pub fn z(qubit: QubitId) -> IrResult<Self> {
        Ok(Self {
            terms: vec![PauliTerm::new(1.0, PauliString::single(qubit, Pauli::Z)?)],
        })
    }

    /// Append a term.
    pub fn push(&mut self, term: PauliTerm) {
        self.terms.push(term);
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Qubits a state must have for the observable to be measured on it.
    pub fn width(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.string.width())
            .max()
            .unwrap_or(0)
    }

    /// True if every term is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(|t| t.string.is_diagonal())
    }
}

impl FromIterator<PauliTerm> for Observable {
    fn from_iter<T: IntoIterator<Item = PauliTerm>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

impl FromStr for Observable {
    type Err = IrError;

    /// Parse `"<coeff> <P><q> ... + ..."`, e.g. `"0.5 X0 Z2 + -1 Y1 + 0.25"`.
    ///
    /// The coefficient defaults to 1; a term without factors is the identity.
    /// A `*` between coefficient and factors is accepted.
    fn from_str(s: &str) -> IrResult<Self> {
        split_terms(s).map(|term| parse_term(term.trim())).collect()
    }
}

/// Split on `+`, except the sign of an exponent such as `1e+3`.
fn split_terms(s: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    let mut pieces = Vec::new();
    let mut prev = None;
    for (i, c) in s.char_indices() {
        if c == '+' && !matches!(prev, Some('e' | 'E')) {
            pieces.push(&s[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    pieces.push(&s[start..]);
    pieces.into_iter()
}

fn parse_term(text: &str) -> IrResult<PauliTerm> {
    let invalid = |why: String| IrError::InvalidObservable(format!("{why} in term '{text}'"));

    let tokens: Vec<&str> = text.split_whitespace().filter(|t| *t != "*").collect();
    let (coeff, factors) = match tokens.split_first() {
        None => return Err(invalid("missing coefficient or factor".into())),
        Some((first, rest)) => match first.parse::<f64>() {
            Ok(coeff) => (coeff, rest),
            Err(_) => (1.0, tokens.as_slice()),
        },
    };
    if !coeff.is_finite() {
        return Err(invalid(format!("non-finite coefficient {coeff}")));
    }

    let ops = factors
        .iter()
        .map(|factor| parse_factor(factor).ok_or_else(|| invalid(format!("bad factor '{factor}'"))))
        .collect::<IrResult<Vec<_>>>()?;
    Ok(PauliTerm::new(coeff, PauliString::from_ops(ops)?))
}

fn parse_factor(factor: &str) -> Option<(QubitId, Pauli)> {
    let mut chars = factor.chars();
    let pauli = match chars.next()? {
        'I' => Pauli::I,
        'X' => Pauli::X,
        'Y' => Pauli::Y,
        'Z' => Pauli::Z,
        _ => return None,
    };
    let qubit = chars.as_str().parse::<u32>().ok()?;
    Some((QubitId(qubit), pauli))
}
