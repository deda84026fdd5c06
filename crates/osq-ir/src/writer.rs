//! Deterministic cQASM 3 serialization: the format produced by
//! `Circuit`'s `Display` impl. One statement per line, floats rounded to
//! seven significant digits, catalog names used wherever a gate has one.

use std::fmt::Write as _;

use osq_algebra::Axis;

use crate::circuit::Circuit;
use crate::gate::{Gate, GateSemantic};
use crate::instruction::{Control, NonUnitary, Statement};

pub fn write_cqasm3(circuit: &Circuit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "version 3.0");
    let _ = writeln!(out);
    let _ = writeln!(out, "qubit[{}] q", circuit.num_qubits());
    if circuit.num_bits() > 0 {
        let _ = writeln!(out, "bit[{}] b", circuit.num_bits());
    }
    let _ = writeln!(out);

    for statement in circuit.statements() {
        let _ = writeln!(out, "{}", format_statement(statement));
    }

    out
}

fn format_statement(statement: &Statement) -> String {
    match statement {
        Statement::Gate(gate) => format_gate(gate),
        Statement::NonUnitary(NonUnitary::Init(q)) => format!("init {q}"),
        Statement::NonUnitary(NonUnitary::Reset(q)) => format!("reset {q}"),
        Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) => {
            format!("{bit} = measure {qubit}")
        }
        Statement::Control(Control::Barrier(q)) => format!("barrier {q}"),
        Statement::Control(Control::Wait { qubit, cycles }) => format!("wait({cycles}) {qubit}"),
        Statement::AsmDeclaration { backend_name, payload } => {
            format!("asm({backend_name}) \"\"\"{payload}\"\"\"")
        }
    }
}

fn format_gate(gate: &Gate) -> String {
    let operands = operand_list(gate);
    match (&gate.semantic, gate.name.as_deref()) {
        (GateSemantic::BlochSphereRotation(r), Some("Rx" | "Ry" | "Rz")) => {
            format!("{}({}) {operands}", gate.name.as_deref().unwrap(), format_float(r.rotation.angle))
        }
        (GateSemantic::BlochSphereRotation(r), Some("PRX")) => {
            let phi = r.rotation.axis.y.atan2(r.rotation.axis.x);
            format!("PRX({}, {}) {operands}", format_float(r.rotation.angle), format_float(phi))
        }
        (GateSemantic::Controlled(c), Some("CR")) => {
            let theta = c.target_gate.as_rotation().map(|r| r.rotation.angle).unwrap_or(0.0);
            format!("CR({}) {operands}", format_float(theta))
        }
        (GateSemantic::Controlled(c), Some("CRk")) => {
            let theta = c.target_gate.as_rotation().map(|r| r.rotation.angle).unwrap_or(0.0);
            format!("CRk({}) {operands}", format_float(theta))
        }
        (_, Some(name)) => format!("{name} {operands}"),
        (GateSemantic::BlochSphereRotation(r), None) => format_rn(&r.rotation.axis, r.rotation.angle, r.rotation.phase, &operands),
        (_, None) => format!("# unrepresentable anonymous gate on {operands}"),
    }
}

fn format_rn(axis: &Axis, angle: f64, phase: f64, operands: &str) -> String {
    format!(
        "Rn({}, {}, {}, {}, {}) {operands}",
        format_float(axis.x),
        format_float(axis.y),
        format_float(axis.z),
        format_float(angle),
        format_float(phase)
    )
}

fn operand_list(gate: &Gate) -> String {
    gate.operands().iter().map(|q| q.to_string()).collect::<Vec<_>>().join(", ")
}

/// Rounds to seven significant digits and trims trailing zeros.
fn format_float(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let magnitude = x.abs().log10().floor() as i32;
    let decimals = (6 - magnitude).max(0) as usize;
    let s = format!("{x:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::qubit::QubitIndex;

    #[test]
    fn header_and_registers_are_emitted() {
        let circuit = Circuit::new("main", 2, 2);
        let text = write_cqasm3(&circuit);
        assert!(text.starts_with("version 3.0\n\n"));
        assert!(text.contains("qubit[2] q"));
        assert!(text.contains("bit[2] b"));
    }

    #[test]
    fn named_gate_uses_catalog_name() {
        let mut circuit = Circuit::new("main", 2, 0);
        circuit.h(0).unwrap().cnot(0, 1).unwrap();
        let text = write_cqasm3(&circuit);
        assert!(text.contains("H q[0]"));
        assert!(text.contains("CNOT q[0], q[1]"));
    }

    #[test]
    fn anonymous_rotation_emits_rn() {
        let mut circuit = Circuit::new("main", 1, 0);
        let axis = Axis::new(0.3, 0.4, 0.5).unwrap();
        let gate = catalog::rn(QubitIndex(0), axis, 0.7, 0.0).unwrap().with_name(None);
        circuit.push_gate(gate).unwrap();
        let text = write_cqasm3(&circuit);
        assert!(text.contains("Rn("));
    }

    #[test]
    fn format_float_trims_trailing_zeros() {
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(3.0), "3");
    }
}
