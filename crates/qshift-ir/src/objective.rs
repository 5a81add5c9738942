//! Objectives: weighted sums of circuit expectation values.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::observable::Observable;

/// A weighted collection of circuits measured against a shared observable.
///
/// Evaluating an objective means summing, over its circuits, the circuit
/// weight times the expectation value of the observable in the state the
/// circuit prepares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    unitaries: Vec<Circuit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observable: Option<Observable>,
}

impl Objective {
    /// Create an objective from weighted circuits, without an observable.
    pub fn new(unitaries: Vec<Circuit>) -> Self {
        Self {
            unitaries,
            observable: None,
        }
    }

    /// An objective with a single circuit measured against `observable`.
    pub fn expectation(circuit: Circuit, observable: Observable) -> Self {
        Self::new(vec![circuit]).with_observable(observable)
    }

    /// Attach an observable.
    #[must_use]
    pub fn with_observable(mut self, observable: Observable) -> Self {
        self.observable = Some(observable);
        self
    }

    /// The weighted circuits.
    #[inline]
    pub fn unitaries(&self) -> &[Circuit] {
        &self.unitaries
    }

    /// Consume the objective, returning its circuits.
    pub fn into_unitaries(self) -> Vec<Circuit> {
        self.unitaries
    }

    /// The observable, if one is attached.
    #[inline]
    pub fn observable(&self) -> Option<&Observable> {
        self.observable.as_ref()
    }

    /// Number of circuits.
    #[inline]
    pub fn len(&self) -> usize {
        self.unitaries.len()
    }

    /// True if the objective has no circuits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.unitaries.is_empty()
    }

    /// The circuit weights, in order.
    pub fn weights(&self) -> Vec<f64> {
        self.unitaries.iter().map(Circuit::weight).collect()
    }
}
