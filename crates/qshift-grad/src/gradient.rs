//! Parameter-shift gradients of circuits and objectives.
//!
//! For every variable of a circuit, [`make_gradient_component`] scans the
//! gates and, for each gate whose parameter depends on that variable, emits
//! copies of the circuit with that one gate replaced by shifted versions.
//! Each copy carries the weight
//!
//!   (shift-rule coefficient) × ∂(gate parameter)/∂(variable)
//!
//! so that the weighted sum of the copies' expectation values is the
//! derivative of the original expectation value.
//!
//! | Gate | Copies | Shifted angles | Coefficients |
//! |------|--------|----------------|--------------|
//! | rotation | 2 | θ ± π/2 | ±1/2 |
//! | controlled rotation | 4 | decomposed halves shifted by ±π/2 | ±1/4 |
//! | power (H, X, Y, Z) | 2 | mapped rotation angle ± π/2 | ±1/2 |

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use qshift_compile::compile_controlled_rotation;
use qshift_ir::{Circuit, Gate, GateKind, Objective, Variable, power_rotation_angle};
use tracing::{debug, instrument};

use crate::chain::weight_chain;
use crate::config::GradientConfig;
use crate::error::{GradError, GradResult, NotImplementedKind};

/// Something [`grad`] can differentiate.
#[derive(Debug, Clone, Copy)]
pub enum GradTarget<'a> {
    /// A bare circuit.
    Circuit(&'a Circuit),
    /// A single gate, treated as a one-gate circuit.
    Gate(&'a Gate),
    /// A single-circuit objective.
    Objective(&'a Objective),
}

impl<'a> From<&'a Circuit> for GradTarget<'a> {
    fn from(circuit: &'a Circuit) -> Self {
        GradTarget::Circuit(circuit)
    }
}

impl<'a> From<&'a Gate> for GradTarget<'a> {
    fn from(gate: &'a Gate) -> Self {
        GradTarget::Gate(gate)
    }
}

impl<'a> From<&'a Objective> for GradTarget<'a> {
    fn from(objective: &'a Objective) -> Self {
        GradTarget::Objective(objective)
    }
}

/// Gradient of `target`: one objective per variable, in discovery order.
pub fn grad<'a>(target: impl Into<GradTarget<'a>>) -> GradResult<Vec<Objective>> {
    grad_with(&GradientConfig::default(), target)
}

/// [`grad`] with explicit configuration.
pub fn grad_with<'a>(
    config: &GradientConfig,
    target: impl Into<GradTarget<'a>>,
) -> GradResult<Vec<Objective>> {
    match target.into() {
        GradTarget::Circuit(circuit) => grad_unitary_with(config, circuit),
        GradTarget::Objective(objective) => grad_objective_with(config, objective),
        GradTarget::Gate(gate) => {
            if !gate.is_parametrized() {
                return Err(GradError::UnsupportedArgumentKind(format!(
                    "unparametrized gate '{gate}'"
                )));
            }
            grad_unitary_with(config, &Circuit::wrap_gate(gate.clone()))
        }
    }
}

/// [`grad`] with configuration loaded by [`GradientConfig::load`].
///
/// `config_file` is an optional YAML file; `QSHIFT_GRAD_*` environment
/// variables override it.
pub fn grad_with_config_file<'a>(
    config_file: Option<&Path>,
    target: impl Into<GradTarget<'a>>,
) -> GradResult<Vec<Objective>> {
    let config = GradientConfig::load(config_file)?;
    grad_with(&config, target)
}

/// Gradient of a circuit: one component per variable.
pub fn grad_unitary(circuit: &Circuit) -> GradResult<Vec<Objective>> {
    grad_unitary_with(&GradientConfig::default(), circuit)
}

/// [`grad_unitary`] with explicit configuration.
///
/// Any failing component aborts the whole gradient. The error reported is
/// the one of the earliest failing variable, in parallel mode too.
#[instrument(skip_all, fields(gates = circuit.len()))]
pub fn grad_unitary_with(
    config: &GradientConfig,
    circuit: &Circuit,
) -> GradResult<Vec<Objective>> {
    let variables = circuit.parameters();
    debug!(variables = variables.len(), "building gradient");

    #[cfg(feature = "rayon")]
    if config.parallel && variables.len() >= config.min_parallel_variables {
        use rayon::prelude::*;
        let components: Vec<GradResult<Objective>> = variables
            .par_iter()
            .map(|var| make_gradient_component(circuit, var))
            .collect();
        return components.into_iter().collect();
    }
    #[cfg(not(feature = "rayon"))]
    let _ = config;

    variables
        .iter()
        .map(|var| make_gradient_component(circuit, var))
        .collect()
}

/// Gradient of a single-circuit objective.
///
/// The objective's observable is attached to every component.
pub fn grad_objective(objective: &Objective) -> GradResult<Vec<Objective>> {
    grad_objective_with(&GradientConfig::default(), objective)
}

/// [`grad_objective`] with explicit configuration.
pub fn grad_objective_with(
    config: &GradientConfig,
    objective: &Objective,
) -> GradResult<Vec<Objective>> {
    let circuit = match objective.unitaries() {
        [circuit] => circuit,
        [] => {
            return Err(GradError::UnsupportedArgumentKind(
                "objective without circuits".into(),
            ));
        }
        unitaries => return Err(GradError::UnsupportedMultiUnitaryObjective(unitaries.len())),
    };

    let components = grad_unitary_with(config, circuit)?;
    Ok(match objective.observable() {
        Some(observable) => components
            .into_iter()
            .map(|component| component.with_observable(observable.clone()))
            .collect(),
        None => components,
    })
}

/// The gradient contribution of `var`: all shifted circuits for gates that
/// depend on it, collected into one objective.
#[instrument(skip_all, fields(var = %var))]
pub fn make_gradient_component(circuit: &Circuit, var: &Variable) -> GradResult<Objective> {
    let mut terms = Vec::new();
    for (position, gate) in circuit.gates().iter().enumerate() {
        if gate.is_frozen() || !gate.is_parametrized() || !gate.parameter().has_variable(var) {
            continue;
        }
        let emitted = terms.len();
        match gate.kind() {
            GateKind::Rotation(_) if gate.is_controlled() => {
                controlled_rotation_terms(circuit, position, gate, var, &mut terms)?;
            }
            GateKind::Rotation(_) => {
                let chain = weight_chain(gate.parameter(), var)?;
                two_term_shift(circuit, position, gate.angle(), chain, &mut terms, |angle| {
                    gate.shifted(angle)
                })?;
            }
            GateKind::Power(name) => {
                if gate.is_controlled() {
                    return Err(NotImplementedKind::ControlledPowerGate.into());
                }
                let (axis, angle) = power_rotation_angle(name, gate.angle())
                    .ok_or_else(|| NotImplementedKind::UnrecognizedGateName(name.clone()))?;
                let chain = weight_chain(gate.parameter(), var)?;
                let target = gate.target();
                two_term_shift(circuit, position, angle, chain, &mut terms, |shifted| {
                    Gate::rotation(axis, target, shifted).frozen()
                })?;
            }
            GateKind::Phase => {
                return Err(GradError::UnsupportedGateKind(gate.name().to_string()));
            }
        }
        debug!(
            position,
            gate = %gate,
            terms = terms.len() - emitted,
            "emitted shifted circuits"
        );
    }
    Ok(Objective::new(terms))
}

/// Two-term rule: `±1/2 · chain` at `angle ± π/2`.
fn two_term_shift(
    circuit: &Circuit,
    position: usize,
    angle: f64,
    chain: f64,
    terms: &mut Vec<Circuit>,
    shifted_gate: impl Fn(f64) -> Gate,
) -> GradResult<()> {
    for (shift, coefficient) in [(FRAC_PI_2, 0.5), (-FRAC_PI_2, -0.5)] {
        let shifted = circuit.replace_gate(position, [shifted_gate(angle + shift)])?;
        terms.push(shifted.with_weight(coefficient * chain));
    }
    Ok(())
}

/// Four-term rule for a controlled rotation.
///
/// The rotation is decomposed into two half-angle rotations around a pair of
/// entanglers, and each half is shifted by ±π/2 on its own. The listed
/// coefficients ±1/2 are scaled by a further 1/2, so the effective weights
/// are `±1/4 · chain`.
fn controlled_rotation_terms(
    circuit: &Circuit,
    position: usize,
    gate: &Gate,
    var: &Variable,
    terms: &mut Vec<Circuit>,
) -> GradResult<()> {
    let half = gate.angle() / 2.0;
    let shifts = [
        ([half + FRAC_PI_2, -half], 0.5),
        ([half - FRAC_PI_2, -half], -0.5),
        ([half, -half + FRAC_PI_2], -0.5),
        ([half, -half - FRAC_PI_2], 0.5),
    ];
    let chain = weight_chain(gate.parameter(), var)?;
    for (angles, coefficient) in shifts {
        let decomposed = compile_controlled_rotation(gate, angles)?;
        let shifted = circuit.replace_gate(position, decomposed)?;
        terms.push(shifted.with_weight(0.5 * coefficient * chain));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use qshift_ir::{Observable, QubitId, Transform};
    use std::f64::consts::{FRAC_PI_4, PI};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_uncontrolled_rotation_component() {
        let theta = Variable::new("theta", 0.3);
        let circuit = Circuit::wrap_gate(Gate::rx(QubitId(0), theta.clone()));

        let component = make_gradient_component(&circuit, &theta).unwrap();
        assert_eq!(component.len(), 2);
        assert_eq!(component.weights(), vec![0.5, -0.5]);

        let plus = &component.unitaries()[0].gates()[0];
        let minus = &component.unitaries()[1].gates()[0];
        assert!(approx(plus.angle(), 0.3 + FRAC_PI_2));
        assert!(approx(minus.angle(), 0.3 - FRAC_PI_2));
        assert!(plus.is_frozen() && minus.is_frozen());
        assert_eq!(plus.name(), "Rx");
    }

    #[test]
    fn test_chain_factor_scales_weights() {
        let a = Variable::new("a", 0.3);
        let b = Variable::new("b", 2.0);
        let circuit = Circuit::wrap_gate(Gate::ry(QubitId(0), a.clone() * b.clone()));

        let component = make_gradient_component(&circuit, &a).unwrap();
        assert_eq!(component.weights(), vec![1.0, -1.0]);
        assert!(approx(component.unitaries()[0].gates()[0].angle(), 0.6 + FRAC_PI_2));

        let component = make_gradient_component(&circuit, &b).unwrap();
        assert!(approx(component.weights()[0], 0.15));
        assert!(approx(component.weights()[1], -0.15));
    }

    #[test]
    fn test_controlled_rotation_component() {
        let theta = Variable::new("theta", 0.8);
        let mut circuit = Circuit::new();
        circuit.h(QubitId(0));
        circuit.cry(theta.clone(), QubitId(0), QubitId(1)).unwrap();

        let component = make_gradient_component(&circuit, &theta).unwrap();
        assert_eq!(component.len(), 4);
        // Coefficients {.5, -.5, -.5, .5} scaled by a further 0.5.
        assert_eq!(component.weights(), vec![0.25, -0.25, -0.25, 0.25]);

        for term in component.unitaries() {
            // H, then Ry · CX · Ry · CX in place of the controlled rotation.
            assert_eq!(term.len(), 5);
            assert_eq!(term.gates()[0].name(), "H");
            assert_eq!(term.gates()[1].name(), "Ry");
            assert_eq!(term.gates()[2].name(), "X");
        }
        let first = &component.unitaries()[0];
        assert!(approx(first.gates()[1].angle(), 0.4 + FRAC_PI_2));
        assert!(approx(first.gates()[3].angle(), -0.4));
        let third = &component.unitaries()[2];
        assert!(approx(third.gates()[1].angle(), 0.4));
        assert!(approx(third.gates()[3].angle(), -0.4 + FRAC_PI_2));
    }

    #[test]
    fn test_power_gate_component() {
        let p = Variable::new("p", 0.5);
        let circuit = Circuit::wrap_gate(Gate::power("X", QubitId(0), p.clone()));

        let component = make_gradient_component(&circuit, &p).unwrap();
        assert_eq!(component.weights(), vec![0.5, -0.5]);
        let plus = &component.unitaries()[0].gates()[0];
        assert_eq!(plus.name(), "Rx");
        assert!(approx(plus.angle(), 0.5 * PI + FRAC_PI_2));

        let circuit = Circuit::wrap_gate(Gate::power("H", QubitId(0), p.clone()));
        let component = make_gradient_component(&circuit, &p).unwrap();
        let minus = &component.unitaries()[1].gates()[0];
        assert_eq!(minus.name(), "Ry");
        assert!(approx(minus.angle(), 0.5 * FRAC_PI_4 - FRAC_PI_2));
    }

    #[test]
    fn test_power_gate_errors() {
        let p = Variable::new("p", 0.5);

        let controlled = Gate::power("Z", QubitId(1), p.clone())
            .with_controls([QubitId(0)])
            .unwrap();
        let err = make_gradient_component(&Circuit::wrap_gate(controlled), &p).unwrap_err();
        assert!(matches!(
            err,
            GradError::NotImplemented(NotImplementedKind::ControlledPowerGate)
        ));

        let unknown = Gate::power("T", QubitId(0), p.clone());
        let err = make_gradient_component(&Circuit::wrap_gate(unknown), &p).unwrap_err();
        assert!(matches!(
            err,
            GradError::NotImplemented(NotImplementedKind::UnrecognizedGateName(name)) if name == "T"
        ));
    }

    #[test]
    fn test_phase_gate_rejected() {
        let phi = Variable::new("phi", 0.1);
        let circuit = Circuit::wrap_gate(Gate::phase(QubitId(0), phi.clone()));
        assert!(matches!(
            make_gradient_component(&circuit, &phi),
            Err(GradError::UnsupportedGateKind(name)) if name == "P"
        ));
    }

    #[test]
    fn test_frozen_gate_contributes_nothing() {
        let theta = Variable::new("theta", 0.3);
        let mut circuit = Circuit::new();
        circuit
            .push(Gate::rx(QubitId(0), theta.clone()).frozen())
            .ry(theta.clone(), QubitId(0));

        let component = make_gradient_component(&circuit, &theta).unwrap();
        assert_eq!(component.len(), 2);
        for term in component.unitaries() {
            assert_eq!(term.gates()[0], circuit.gates()[0]);
            assert_eq!(term.gates()[1].name(), "Ry");
        }

        let frozen_only = Circuit::wrap_gate(Gate::rx(QubitId(0), theta.clone()).frozen());
        assert!(grad(&frozen_only).unwrap().is_empty());
        assert!(make_gradient_component(&frozen_only, &theta).unwrap().is_empty());
    }

    #[test]
    fn test_grad_dispatch() {
        let a = Variable::new("a", 0.1);
        let b = Variable::new("b", 0.2);
        let mut circuit = Circuit::new();
        circuit.rx(a.clone(), QubitId(0)).ry(b.clone() + a.clone(), QubitId(1));

        let gradient = grad(&circuit).unwrap();
        assert_eq!(gradient.len(), 2);
        // a appears in both gates, b only in the second.
        assert_eq!(gradient[0].len(), 4);
        assert_eq!(gradient[1].len(), 2);

        let gate = Gate::rz(QubitId(0), a.clone());
        assert_eq!(grad(&gate).unwrap().len(), 1);

        let err = grad(&Gate::h(QubitId(0))).unwrap_err();
        assert!(matches!(err, GradError::UnsupportedArgumentKind(_)));
    }

    #[test]
    fn test_grad_objective_attaches_observable() {
        let a = Variable::new("a", 0.1);
        let circuit = Circuit::wrap_gate(Gate::rx(QubitId(0), a));
        let objective = Objective::expectation(circuit, Observable::z(QubitId(0)).unwrap());

        let gradient = grad(&objective).unwrap();
        assert_eq!(gradient.len(), 1);
        let expected = Observable::z(QubitId(0)).unwrap();
        assert_eq!(gradient[0].observable(), Some(&expected));
    }

    #[test]
    fn test_grad_objective_rejects_multiple_unitaries() {
        let a = Variable::new("a", 0.1);
        let c = Circuit::wrap_gate(Gate::rx(QubitId(0), a));
        let objective = Objective::new(vec![c.clone(), c]);
        assert!(matches!(
            grad(&objective),
            Err(GradError::UnsupportedMultiUnitaryObjective(2))
        ));
        assert!(matches!(
            grad(&Objective::default()),
            Err(GradError::UnsupportedArgumentKind(_))
        ));
    }

    #[test]
    fn test_failure_aborts_whole_gradient() {
        let a = Variable::new("a", 0.1);
        let b = Variable::new("b", 0.2);
        let mut circuit = Circuit::new();
        circuit.rx(a, QubitId(0)).p(b, QubitId(0));
        assert!(matches!(
            grad(&circuit),
            Err(GradError::UnsupportedGateKind(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let vars: Vec<_> = (0..6)
            .map(|i| Variable::new(format!("v{i}"), 0.1 * f64::from(i)))
            .collect();
        let mut circuit = Circuit::new();
        for (i, v) in vars.iter().enumerate() {
            let q = QubitId(u32::try_from(i % 3).unwrap());
            circuit.ry(v.clone(), q);
            circuit.rz(Transform::mul(v.clone(), 2.0), q);
        }

        let sequential = grad(&circuit).unwrap();
        let parallel = grad_with(&GradientConfig::parallel(), &circuit).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_parallel_reports_first_error() {
        let a = Variable::new("a", 0.1);
        let b = Variable::new("b", 0.2);
        let mut circuit = Circuit::new();
        circuit.p(a, QubitId(0));
        circuit.push(
            Gate::power("Z", QubitId(1), b)
                .with_controls([QubitId(0)])
                .unwrap(),
        );
        let config = GradientConfig {
            parallel: true,
            min_parallel_variables: 1,
        };

        // `a` fails first; `b` fails differently and must not win the race.
        for _ in 0..16 {
            assert!(matches!(
                grad_with(&config, &circuit),
                Err(GradError::UnsupportedGateKind(name)) if name == "P"
            ));
        }
    }

    #[test]
    fn test_signed_zero_variable_has_one_component() {
        let mut circuit = Circuit::new();
        circuit
            .rx(Variable::new("a", 0.0), QubitId(0))
            .ry(Variable::new("a", -0.0), QubitId(0));

        let gradient = grad(&circuit).unwrap();
        assert_eq!(gradient.len(), 1);
        assert_eq!(gradient[0].len(), 4);
    }

    #[test]
    fn test_grad_with_config_file() {
        let a = Variable::new("a", 0.3);
        let circuit = Circuit::wrap_gate(Gate::rx(QubitId(0), a));

        let err = grad_with_config_file(Some(Path::new("/nonexistent/qshift.yaml")), &circuit)
            .unwrap_err();
        assert!(matches!(err, GradError::Config(ConfigError::IoError(_))));

        let dir = std::env::temp_dir().join(format!("qshift-grad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("grad.yaml");
        std::fs::write(&path, "parallel: true\nmin_parallel_variables: 0\n").unwrap();
        let err = grad_with_config_file(Some(&path), &circuit).unwrap_err();
        assert!(matches!(err, GradError::Config(ConfigError::ValidationError(_))));

        std::fs::write(&path, "parallel: true\nmin_parallel_variables: 1\n").unwrap();
        let gradient = grad_with_config_file(Some(&path), &circuit).unwrap();
        assert_eq!(gradient, grad(&circuit).unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_idempotent() {
        let a = Variable::new("a", 0.4);
        let mut circuit = Circuit::new();
        circuit.rx(a.clone(), QubitId(0));
        circuit.crz(a.clone() * 3.0, QubitId(0), QubitId(1)).unwrap();

        let first = grad(&circuit).unwrap();
        let second = grad(&circuit).unwrap();
        assert_eq!(first, second);
    }
}
