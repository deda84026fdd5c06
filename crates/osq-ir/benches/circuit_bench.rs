//! Benchmarks for circuit construction and unitary composition.
//!
//! Run with: cargo bench -p osq-ir

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use osq_ir::Circuit;
use std::f64::consts::PI;

fn bench_circuit_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_creation");

    for num_qubits in &[2, 5, 10, 20, 50] {
        group.bench_with_input(BenchmarkId::new("new", num_qubits), num_qubits, |b, &n| {
            b.iter(|| Circuit::new(black_box("bench"), black_box(n), black_box(n)));
        });
    }

    group.finish();
}

fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::new("bench", 10, 0);
        b.iter(|| {
            circuit.h(black_box(0)).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::new("bench", 10, 0);
        b.iter(|| {
            circuit.rx(black_box(0), black_box(PI / 4.0)).unwrap();
        });
    });

    group.bench_function("cnot_gate", |b| {
        let mut circuit = Circuit::new("bench", 10, 0);
        b.iter(|| {
            circuit.cnot(black_box(0), black_box(1)).unwrap();
        });
    });

    group.bench_function("cz_gate", |b| {
        let mut circuit = Circuit::new("bench", 10, 0);
        b.iter(|| {
            circuit.cz(black_box(0), black_box(1)).unwrap();
        });
    });

    group.finish();
}

fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3u32, 5, 10, 20, 50, 100] {
        group.bench_with_input(BenchmarkId::new("build", num_qubits), num_qubits, |b, &n| {
            b.iter(|| {
                let mut circuit = Circuit::new("ghz", n, n);
                circuit.h(0).unwrap();
                for i in 0..n - 1 {
                    circuit.cnot(i, i + 1).unwrap();
                }
                for i in 0..n {
                    circuit.measure(i, i).unwrap();
                }
                black_box(circuit)
            });
        });
    }

    group.finish();
}

/// Full-space unitary composition is exponential in qubit count — kept to
/// small registers, unlike the other groups above.
fn bench_circuit_unitary(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_unitary");

    for num_qubits in &[2u32, 4, 6, 8] {
        let mut circuit = Circuit::new("bench", *num_qubits, 0);
        for _layer in 0..5 {
            for i in 0..*num_qubits {
                circuit.h(i).unwrap();
            }
            for i in (0..num_qubits - 1).step_by(2) {
                circuit.cnot(i, i + 1).unwrap();
            }
        }

        group.bench_with_input(BenchmarkId::new("unitary", num_qubits), &circuit, |b, circuit| {
            b.iter(|| black_box(circuit.unitary()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_circuit_creation,
    bench_gate_addition,
    bench_ghz_circuit,
    bench_circuit_unitary,
);

criterion_main!(benches);
