//! Gate semantics: every unitary statement body is one of three
//! variants, plus an optional catalog name. Replaces the source's gate
//! class hierarchy with a tagged union — no inheritance tree is needed.

use osq_algebra::{equal_up_to_global_phase, Axis, BlochRotation, Matrix2};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitIndex;

/// A single-qubit unitary body: `BlochSphereRotation`, `ControlledGate`, or
/// `MatrixGate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateSemantic {
    BlochSphereRotation(BlochSphereRotation),
    Controlled(Box<ControlledGate>),
    Matrix(MatrixGate),
}

/// `exp(i·phase)·cos(θ/2)·I − i·sin(θ/2)·(axis·σ)` acting on `qubit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlochSphereRotation {
    pub qubit: QubitIndex,
    pub rotation: BlochRotation,
}

impl BlochSphereRotation {
    pub fn new(qubit: QubitIndex, rotation: BlochRotation) -> Self {
        BlochSphereRotation { qubit, rotation }
    }

    pub fn identity(qubit: QubitIndex) -> Self {
        BlochSphereRotation { qubit, rotation: BlochRotation::identity() }
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        self.rotation.is_identity(eps)
    }
}

/// A controlled version of `target_gate`, conditioned on `control` being `|1⟩`.
///
/// Invariant: `control` never appears among `target_gate`'s operands — this
/// is enforced at construction, not left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    pub control: QubitIndex,
    pub target_gate: Gate,
}

/// A dense `2^k × 2^k` unitary acting on `k` operands (`k ∈ {1, 2}` in practice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixGate {
    pub matrix: Matrix2,
    pub operands: Vec<QubitIndex>,
}

impl MatrixGate {
    /// Numerical tolerance for the unitarity check, matching the component
    /// default.
    pub const EPSILON: f64 = 1e-8;

    pub fn new(matrix: Matrix2, operands: Vec<QubitIndex>) -> IrResult<Self> {
        let expected_dim = 1usize << operands.len();
        if matrix.dim != expected_dim {
            return Err(IrError::invalid_gate(format!(
                "matrix dimension {} does not match {} operand(s)",
                matrix.dim,
                operands.len()
            )));
        }
        if !matrix.is_unitary(Self::EPSILON) {
            return Err(IrError::invalid_gate("matrix is not unitary within tolerance"));
        }
        Ok(MatrixGate { matrix, operands })
    }
}

/// A unitary statement body: a [`GateSemantic`] plus an optional catalog name.
///
/// An unnamed gate is *anonymous*. Two named gates of the same catalog
/// identity with identical parameters compare equal;
/// `PartialEq` on `Gate` compares the semantic body structurally, which
/// implies this for gates built from the catalog (see `osq-ir::catalog`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub semantic: GateSemantic,
    pub name: Option<String>,
}

impl Gate {
    pub fn rotation(qubit: QubitIndex, rotation: BlochRotation, name: Option<String>) -> Self {
        Gate {
            semantic: GateSemantic::BlochSphereRotation(BlochSphereRotation::new(qubit, rotation)),
            name,
        }
    }

    pub fn controlled(control: QubitIndex, target_gate: Gate, name: Option<String>) -> IrResult<Self> {
        if target_gate.operands().contains(&control) {
            return Err(IrError::invalid_gate(format!(
                "control qubit {control} must not be an operand of the target gate"
            )));
        }
        Ok(Gate {
            semantic: GateSemantic::Controlled(Box::new(ControlledGate { control, target_gate })),
            name,
        })
    }

    pub fn matrix(matrix: Matrix2, operands: Vec<QubitIndex>, name: Option<String>) -> IrResult<Self> {
        let has_duplicates = (1..operands.len()).any(|i| operands[i..].contains(&operands[i - 1]));
        if has_duplicates {
            return Err(IrError::duplicate_operand(operands[0]));
        }
        Ok(Gate { semantic: GateSemantic::Matrix(MatrixGate::new(matrix, operands)?), name })
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// Returns a copy of this gate under a different (or absent) catalog name.
    pub fn with_name(&self, name: Option<String>) -> Gate {
        Gate { semantic: self.semantic.clone(), name }
    }

    /// Every qubit this gate touches, in a stable order: for
    /// `ControlledGate`, the control first, then the target's operands.
    pub fn operands(&self) -> Vec<QubitIndex> {
        match &self.semantic {
            GateSemantic::BlochSphereRotation(r) => vec![r.qubit],
            GateSemantic::Controlled(c) => {
                let mut ops = vec![c.control];
                ops.extend(c.target_gate.operands());
                ops
            }
            GateSemantic::Matrix(m) => m.operands.clone(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.operands().len()
    }

    pub fn is_single_qubit_rotation(&self) -> bool {
        matches!(self.semantic, GateSemantic::BlochSphereRotation(_))
    }

    pub fn as_rotation(&self) -> Option<&BlochSphereRotation> {
        match &self.semantic {
            GateSemantic::BlochSphereRotation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_controlled(&self) -> Option<&ControlledGate> {
        match &self.semantic {
            GateSemantic::Controlled(c) => Some(c),
            _ => None,
        }
    }

    /// Rewrites every operand through `f`, preserving the gate's semantic
    /// shape and name. Used by routers and mappers to apply a live
    /// virtual→physical mapping.
    pub fn map_operands(&self, f: impl Fn(QubitIndex) -> QubitIndex + Copy) -> Gate {
        let semantic = match &self.semantic {
            GateSemantic::BlochSphereRotation(r) => {
                GateSemantic::BlochSphereRotation(BlochSphereRotation {
                    qubit: f(r.qubit),
                    rotation: r.rotation,
                })
            }
            GateSemantic::Controlled(c) => GateSemantic::Controlled(Box::new(ControlledGate {
                control: f(c.control),
                target_gate: c.target_gate.map_operands(f),
            })),
            GateSemantic::Matrix(m) => GateSemantic::Matrix(MatrixGate {
                matrix: m.matrix.clone(),
                operands: m.operands.iter().map(|&q| f(q)).collect(),
            }),
        };
        Gate { semantic, name: self.name.clone() }
    }

    /// Dense matrix for this gate over its own operands, in the basis where
    /// operand `0` is the most significant qubit. Used by replacement and
    /// round-trip equivalence checks (ε default `1e-8`).
    pub fn to_matrix(&self) -> Matrix2 {
        match &self.semantic {
            GateSemantic::BlochSphereRotation(r) => r.rotation.to_matrix(),
            GateSemantic::Matrix(m) => m.matrix.clone(),
            GateSemantic::Controlled(c) => controlled_to_matrix(c),
        }
    }

    pub fn equal_up_to_global_phase(&self, other: &Gate, eps: f64) -> bool {
        if self.operands() != other.operands() {
            return false;
        }
        equal_up_to_global_phase(&self.to_matrix(), &other.to_matrix(), eps)
    }
}

/// Builds the `2×2^k × 2×2^k` matrix of a controlled gate: block-diagonal
/// with identity on the `|0⟩` control block and `target_gate`'s matrix on
/// the `|1⟩` block, control as the most significant qubit.
fn controlled_to_matrix(controlled: &ControlledGate) -> Matrix2 {
    use num_complex::Complex64;

    let inner = controlled.target_gate.to_matrix();
    let inner_dim = inner.dim;
    let dim = inner_dim * 2;
    let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..inner_dim {
        data[i * dim + i] = Complex64::new(1.0, 0.0);
    }
    for i in 0..inner_dim {
        for j in 0..inner_dim {
            data[(inner_dim + i) * dim + (inner_dim + j)] = inner.get(i, j);
        }
    }
    Matrix2::new(dim, data)
}

pub use Axis as GateAxis;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn controlled_gate_rejects_control_as_target_operand() {
        let x = Gate::rotation(QubitIndex(0), BlochRotation::from_axis(Axis::X, PI, 0.0).unwrap(), Some("X".into()));
        let err = Gate::controlled(QubitIndex(0), x, Some("CNOT".into()));
        assert!(err.is_err());
    }

    #[test]
    fn cnot_matrix_is_block_diagonal() {
        let x = Gate::rotation(QubitIndex(1), BlochRotation::from_axis(Axis::X, PI, 0.0).unwrap(), Some("X".into()));
        let cnot = Gate::controlled(QubitIndex(0), x, Some("CNOT".into())).unwrap();
        let m = cnot.to_matrix();
        assert_eq!(m.dim, 4);
        assert!((m.get(0, 0).re - 1.0).abs() < 1e-9);
        assert!((m.get(2, 3).re - 1.0).abs() < 1e-9 || (m.get(2, 3).im.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn operands_orders_control_before_target() {
        let x = Gate::rotation(QubitIndex(2), BlochRotation::from_axis(Axis::X, PI, 0.0).unwrap(), Some("X".into()));
        let cnot = Gate::controlled(QubitIndex(0), x, Some("CNOT".into())).unwrap();
        assert_eq!(cnot.operands(), vec![QubitIndex(0), QubitIndex(2)]);
    }
}
