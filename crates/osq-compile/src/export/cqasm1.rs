//! cQASM 1.0 export: a lossy downgrade from the richer cQASM 3 IR —
//! bit-register declarations and measurement assignments are dropped,
//! gate names are lowercased, and consecutive barriers on distinct qubits
//! are regrouped into a single SGMQ line.

use std::fmt::Write as _;

use osq_algebra::Axis;
use osq_ir::{Circuit, Exporter, Gate, GateSemantic, IrError, IrResult, Statement};

pub struct Cqasm1Exporter {
    pub epsilon: f64,
}

impl Cqasm1Exporter {
    pub fn new() -> Self {
        Cqasm1Exporter { epsilon: 1e-8 }
    }
}

impl Default for Cqasm1Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for Cqasm1Exporter {
    type Output = String;

    fn export(&self, circuit: &Circuit) -> IrResult<String> {
        let mut out = String::new();
        let _ = writeln!(out, "version 1.0");
        let _ = writeln!(out);
        let _ = writeln!(out, "qubits {}", circuit.num_qubits());
        let _ = writeln!(out);

        let statements = circuit.statements();
        let mut index = 0;
        while index < statements.len() {
            if let Statement::Control(osq_ir::Control::Barrier(first)) = &statements[index] {
                let mut qubits = vec![*first];
                let mut next = index + 1;
                while let Some(Statement::Control(osq_ir::Control::Barrier(q))) = statements.get(next) {
                    if !qubits.contains(q) {
                        qubits.push(*q);
                    }
                    next += 1;
                }
                let operands =
                    qubits.iter().map(|q| format!("q[{}]", q.index())).collect::<Vec<_>>().join(", ");
                let _ = writeln!(out, "barrier {operands}");
                index = next;
                continue;
            }

            let line = format_statement(&statements[index], self.epsilon).map_err(|e| e.at(index))?;
            if let Some(line) = line {
                let _ = writeln!(out, "{line}");
            }
            index += 1;
        }

        Ok(out)
    }
}

fn format_statement(statement: &Statement, epsilon: f64) -> IrResult<Option<String>> {
    match statement {
        Statement::Gate(gate) => Ok(Some(format_gate(gate, epsilon)?)),
        Statement::NonUnitary(osq_ir::NonUnitary::Init(q)) => Ok(Some(format!("prep_z q[{}]", q.index()))),
        Statement::NonUnitary(osq_ir::NonUnitary::Reset(q)) => Ok(Some(format!("prep_z q[{}]", q.index()))),
        Statement::NonUnitary(osq_ir::NonUnitary::Measure { qubit, .. }) => {
            Ok(Some(format!("measure_z q[{}]", qubit.index())))
        }
        Statement::Control(osq_ir::Control::Barrier(q)) => Ok(Some(format!("barrier q[{}]", q.index()))),
        Statement::Control(osq_ir::Control::Wait { .. }) => Ok(None),
        Statement::AsmDeclaration { .. } => Ok(None),
    }
}

fn format_gate(gate: &Gate, epsilon: f64) -> IrResult<String> {
    let operands =
        gate.operands().iter().map(|q| format!("q[{}]", q.index())).collect::<Vec<_>>().join(", ");

    if let GateSemantic::BlochSphereRotation(r) = &gate.semantic {
        let axis_name = axis_aligned_name(&r.rotation.axis, epsilon);
        if let Some(axis_name) = axis_name {
            return Ok(format!("{axis_name} {operands}, {}", format_angle(r.rotation.angle)));
        }
        return Err(unsupported(gate));
    }

    match gate.name.as_deref() {
        Some(name) => Ok(format!("{} {operands}", name.to_lowercase())),
        None => Err(unsupported(gate)),
    }
}

fn axis_aligned_name(axis: &Axis, epsilon: f64) -> Option<&'static str> {
    if (axis.x - 1.0).abs() < epsilon && axis.y.abs() < epsilon && axis.z.abs() < epsilon {
        Some("rx")
    } else if axis.x.abs() < epsilon && (axis.y - 1.0).abs() < epsilon && axis.z.abs() < epsilon {
        Some("ry")
    } else if axis.x.abs() < epsilon && axis.y.abs() < epsilon && (axis.z - 1.0).abs() < epsilon {
        Some("rz")
    } else {
        None
    }
}

fn unsupported(gate: &Gate) -> IrError {
    IrError::UnsupportedGate {
        exporter: "cQASM1".to_string(),
        gate_name: gate.name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
        location: None,
    }
}

fn format_angle(angle: f64) -> String {
    let s = format!("{angle:.7}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
