//! Single-qubit gate fusion.

use rustc_hash::FxHashMap;
use tracing::debug;

use osq_ir::{catalog, Gate, IrResult, Merger, QubitIndex, Statement};

/// Fuses consecutive [`osq_ir::BlochSphereRotation`] statements on the same
/// qubit into a single rotation, flushing on any barrier (all qubits), any
/// multi-qubit gate, non-unitary instruction, or wait (touched qubits only).
pub struct RotationMerger {
    pub epsilon: f64,
}

impl RotationMerger {
    pub fn new() -> Self {
        RotationMerger { epsilon: catalog::EPSILON }
    }
}

impl Default for RotationMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl Merger for RotationMerger {
    fn merge(&self, statements: &[Statement]) -> IrResult<Vec<Statement>> {
        let mut pending: FxHashMap<QubitIndex, Gate> = FxHashMap::default();
        let mut out = Vec::with_capacity(statements.len());

        for statement in statements {
            match statement {
                Statement::Gate(gate) if gate.is_single_qubit_rotation() => {
                    let qubit = gate.as_rotation().unwrap().qubit;
                    match pending.remove(&qubit) {
                        Some(accumulated) => {
                            let fused = fuse(&accumulated, gate, self.epsilon)?;
                            pending.insert(qubit, fused);
                        }
                        None => {
                            pending.insert(qubit, gate.clone());
                        }
                    }
                }
                Statement::Control(osq_ir::Control::Barrier(_)) => {
                    flush_all(&mut pending, &mut out, self.epsilon);
                    out.push(statement.clone());
                }
                other => {
                    for qubit in other.qubit_operands() {
                        flush_one(&mut pending, &mut out, qubit, self.epsilon);
                    }
                    out.push(statement.clone());
                }
            }
        }

        flush_all(&mut pending, &mut out, self.epsilon);
        debug!(before = statements.len(), after = out.len(), "rotation merge complete");
        Ok(out)
    }
}

/// Composes `second` after `first` on the same qubit, re-naming against the
/// catalog if the fused rotation matches a known entry.
fn fuse(first: &Gate, second: &Gate, epsilon: f64) -> IrResult<Gate> {
    let r1 = &first.as_rotation().unwrap().rotation;
    let r2 = &second.as_rotation().unwrap().rotation;
    let qubit = first.as_rotation().unwrap().qubit;
    let composed = r1.compose(r2)?;
    let name = catalog::recognize_rotation(&composed, epsilon);
    Ok(Gate::rotation(qubit, composed, name))
}

fn flush_one(
    pending: &mut FxHashMap<QubitIndex, Gate>,
    out: &mut Vec<Statement>,
    qubit: QubitIndex,
    epsilon: f64,
) {
    if let Some(gate) = pending.remove(&qubit) {
        push_if_not_identity(out, gate, epsilon);
    }
}

fn flush_all(pending: &mut FxHashMap<QubitIndex, Gate>, out: &mut Vec<Statement>, epsilon: f64) {
    let mut qubits: Vec<_> = pending.keys().copied().collect();
    qubits.sort();
    for qubit in qubits {
        flush_one(pending, out, qubit, epsilon);
    }
}

fn push_if_not_identity(out: &mut Vec<Statement>, gate: Gate, epsilon: f64) {
    if !gate.as_rotation().unwrap().is_identity(epsilon) {
        out.push(Statement::gate(gate));
    }
}
