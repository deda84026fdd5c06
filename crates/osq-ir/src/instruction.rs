//! The `Statement` tagged union — replaces the source's visitor-object
//! pattern with explicit pattern matching over IR; each pass is a free
//! function over `Vec<Statement>`.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::{BitIndex, QubitIndex};

/// A non-unitary instruction: state preparation, reset, or measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NonUnitary {
    Init(QubitIndex),
    Reset(QubitIndex),
    Measure { qubit: QubitIndex, bit: BitIndex },
}

/// A control instruction: a synchronization fence or a fixed wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    Barrier(QubitIndex),
    Wait { qubit: QubitIndex, cycles: u64 },
}

/// A single entry in the IR's ordered statement list. Index in the list is
/// program order — the sole ordering authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Gate(Gate),
    NonUnitary(NonUnitary),
    Control(Control),
    /// Opaque passthrough, filtered by `backend_name` at export time.
    AsmDeclaration { backend_name: String, payload: String },
}

impl Statement {
    pub fn gate(gate: Gate) -> Self {
        Statement::Gate(gate)
    }

    pub fn init(qubit: QubitIndex) -> Self {
        Statement::NonUnitary(NonUnitary::Init(qubit))
    }

    pub fn reset(qubit: QubitIndex) -> Self {
        Statement::NonUnitary(NonUnitary::Reset(qubit))
    }

    pub fn measure(qubit: QubitIndex, bit: BitIndex) -> Self {
        Statement::NonUnitary(NonUnitary::Measure { qubit, bit })
    }

    pub fn barrier(qubit: QubitIndex) -> Self {
        Statement::Control(Control::Barrier(qubit))
    }

    pub fn wait(qubit: QubitIndex, cycles: u64) -> Self {
        Statement::Control(Control::Wait { qubit, cycles })
    }

    pub fn asm(backend_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Statement::AsmDeclaration { backend_name: backend_name.into(), payload: payload.into() }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self, Statement::Gate(_))
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self, Statement::Control(Control::Barrier(_)))
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, Statement::NonUnitary(NonUnitary::Measure { .. }))
    }

    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Statement::Gate(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_gate_mut(&mut self) -> Option<&mut Gate> {
        match self {
            Statement::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Every qubit this statement touches (bit indices are tracked
    /// separately via `clbit_operand`).
    pub fn qubit_operands(&self) -> Vec<QubitIndex> {
        match self {
            Statement::Gate(g) => g.operands(),
            Statement::NonUnitary(NonUnitary::Init(q) | NonUnitary::Reset(q)) => vec![*q],
            Statement::NonUnitary(NonUnitary::Measure { qubit, .. }) => vec![*qubit],
            Statement::Control(Control::Barrier(q)) => vec![*q],
            Statement::Control(Control::Wait { qubit, .. }) => vec![*qubit],
            Statement::AsmDeclaration { .. } => vec![],
        }
    }

    pub fn clbit_operand(&self) -> Option<BitIndex> {
        match self {
            Statement::NonUnitary(NonUnitary::Measure { bit, .. }) => Some(*bit),
            _ => None,
        }
    }

    /// Rewrites every qubit operand through `f`. Non-unitary/control
    /// instructions and `AsmDeclaration` passthroughs are rewritten too but
    /// never trigger routing decisions.
    pub fn map_qubits(&self, f: impl Fn(QubitIndex) -> QubitIndex + Copy) -> Statement {
        match self {
            Statement::Gate(g) => Statement::Gate(g.map_operands(f)),
            Statement::NonUnitary(NonUnitary::Init(q)) => Statement::init(f(*q)),
            Statement::NonUnitary(NonUnitary::Reset(q)) => Statement::reset(f(*q)),
            Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) => {
                Statement::measure(f(*qubit), *bit)
            }
            Statement::Control(Control::Barrier(q)) => Statement::barrier(f(*q)),
            Statement::Control(Control::Wait { qubit, cycles }) => Statement::wait(f(*qubit), *cycles),
            Statement::AsmDeclaration { backend_name, payload } => {
                Statement::AsmDeclaration { backend_name: backend_name.clone(), payload: payload.clone() }
            }
        }
    }

    /// Validates operand well-formedness against register size `num_qubits`:
    /// distinct operands and in range. Control-disjoint
    /// from target is already enforced by `Gate::controlled` at
    /// construction; this re-checks range/duplication for gates built
    /// without going through the catalog.
    pub fn validate_operands(&self, num_qubits: u32) -> IrResult<()> {
        let operands = self.qubit_operands();
        for &q in &operands {
            if q.0 >= num_qubits {
                return Err(IrError::operand_out_of_range(q, num_qubits));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for &q in &operands {
            if !seen.insert(q) {
                return Err(IrError::duplicate_operand(q));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn map_qubits_rewrites_gate_operands() {
        let stmt = Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(1)));
        let mapped = stmt.map_qubits(|q| QubitIndex(q.0 + 10));
        assert_eq!(mapped.qubit_operands(), vec![QubitIndex(10), QubitIndex(11)]);
    }

    #[test]
    fn validate_operands_rejects_out_of_range() {
        let stmt = Statement::gate(catalog::x(QubitIndex(5)));
        assert!(stmt.validate_operands(3).is_err());
    }

    #[test]
    fn asm_declaration_has_no_qubit_operands() {
        let stmt = Statement::asm("quantify", "payload");
        assert!(stmt.qubit_operands().is_empty());
    }
}
