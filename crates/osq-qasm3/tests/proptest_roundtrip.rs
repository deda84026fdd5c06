//! Property-based tests over the cQASM 3 frontend: a circuit built from the
//! catalog gate set, written out and re-read, must still denote the same
//! unitary up to global phase — not just the same statement count.

use osq_ir::Circuit;
use proptest::prelude::*;
use std::f64::consts::PI;

#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Y(u32),
    Z(u32),
    S(u32),
    Rz(u32, f64),
    Cnot(u32, u32),
    Cz(u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::H(q) => circuit.h(q),
            GateOp::X(q) => circuit.x(q),
            GateOp::Y(q) => circuit.y(q),
            GateOp::Z(q) => circuit.z(q),
            GateOp::S(q) => circuit.s(q),
            GateOp::Rz(q, theta) => circuit.rz(q, theta),
            GateOp::Cnot(c, t) => circuit.cnot(c, t),
            GateOp::Cz(c, t) => circuit.cz(c, t),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> BoxedStrategy<GateOp> {
    if num_qubits < 2 {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::Y),
            (0..num_qubits).prop_map(GateOp::Z),
            (0..num_qubits).prop_map(GateOp::S),
            (0..num_qubits, -PI..PI).prop_map(|(q, t)| GateOp::Rz(q, t)),
        ]
        .boxed()
    } else {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::Y),
            (0..num_qubits).prop_map(GateOp::Z),
            (0..num_qubits).prop_map(GateOp::S),
            (0..num_qubits, -PI..PI).prop_map(|(q, t)| GateOp::Rz(q, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::Cnot(c, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::Cz(c, t)),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=4).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=8).prop_map(move |ops| {
            let mut circuit = Circuit::new("test", num_qubits, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    /// Writing a circuit to cQASM 3 and reading it back preserves the
    /// register sizes and the gate-only unitary up to global phase.
    #[test]
    fn roundtrip_preserves_unitary(circuit in arb_circuit()) {
        let text = circuit.to_string();
        let reparsed = osq_qasm3::parse(&text).expect("writer output must re-parse");

        prop_assert_eq!(circuit.num_qubits(), reparsed.num_qubits());

        let original_unitary = circuit.unitary();
        let reparsed_unitary = reparsed.unitary();
        prop_assert!(osq_algebra::equal_up_to_global_phase(&original_unitary, &reparsed_unitary, 1e-7));
    }
}
