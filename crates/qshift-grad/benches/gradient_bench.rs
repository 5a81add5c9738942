//! Benchmarks for gradient construction
//!
//! Run with: cargo bench -p qshift-grad

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qshift_grad::{GradientConfig, grad, grad_with, weight_chain};
use qshift_ir::{Circuit, Parameter, QubitId, Transform, Variable};

/// Layered ansatz: Ry on every qubit, then a ring of controlled Rz.
fn layered_ansatz(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::new();
    for layer in 0..layers {
        for q in 0..num_qubits {
            let var = Variable::new(format!("y{layer}_{q}"), 0.1 * f64::from(q + 1));
            circuit.ry(var, QubitId(q));
        }
        for q in 0..num_qubits {
            let var = Variable::new(format!("z{layer}_{q}"), 0.2 * f64::from(layer + 1));
            let target = QubitId((q + 1) % num_qubits);
            // A ring on one qubit would control the target itself.
            if target != QubitId(q) {
                let _ = circuit.crz(var, QubitId(q), target);
            }
        }
    }
    circuit
}

/// Benchmark gradients of increasingly wide ansatz circuits
fn bench_grad_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("grad_circuit");

    for num_qubits in &[2, 4, 8, 16] {
        let circuit = layered_ansatz(*num_qubits, 2);
        group.bench_with_input(
            BenchmarkId::new("sequential", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| grad(black_box(circuit)).unwrap());
            },
        );

        let config = GradientConfig::parallel();
        group.bench_with_input(
            BenchmarkId::new("parallel", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| grad_with(&config, black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the chain rule on deep expressions
fn bench_weight_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight_chain");

    let x = Variable::new("x", 0.7);
    for depth in &[1, 8, 32] {
        let mut expr = Parameter::from(&x);
        for i in 0..*depth {
            expr = Transform::add(Transform::mul(expr, 1.01), f64::from(i)).into();
        }
        group.bench_with_input(BenchmarkId::new("depth", depth), &expr, |b, expr| {
            b.iter(|| weight_chain(black_box(expr), black_box(&x)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grad_circuit, bench_weight_chain);
criterion_main!(benches);
