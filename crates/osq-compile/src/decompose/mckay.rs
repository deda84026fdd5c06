//! McKay decomposition: rewrites any single-qubit rotation into
//! `Rz(γ)·X90·Rz(β)·X90·Rz(α)`, the native gate set of superconducting
//! backends driven by fixed π/2 pulses.

use std::f64::consts::PI;

use osq_algebra::{canonical_angle, Axis};
use osq_ir::{catalog, Decomposer, Gate, IrResult, Statement};

/// Decomposes via ZYZ and substitutes each `Ry` for the McKay identity
/// `Rx(θ) = Rz(-π/2)·X90·Rz(π-θ)·X90·Rz(-π/2)`, folding the extra `Rz`
/// terms into the neighboring `Rz(θ1)` and `Rz(θ3)`.
pub struct McKayDecomposer {
    pub epsilon: f64,
}

impl McKayDecomposer {
    pub fn new() -> Self {
        McKayDecomposer { epsilon: catalog::EPSILON }
    }
}

impl Default for McKayDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer for McKayDecomposer {
    fn name(&self) -> &'static str {
        "McKayDecomposer"
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some(rotation) = gate.as_rotation() else {
            return Ok(None);
        };
        let qubit = rotation.qubit;
        let angles = rotation.rotation.decompose_to_axes(Axis::Z, Axis::Y);

        let alpha = canonical_angle(angles.theta3 - PI);
        let beta = canonical_angle(PI - angles.theta2);
        let gamma = canonical_angle(angles.theta1);

        let mut out = Vec::with_capacity(5);
        if alpha.abs() > self.epsilon {
            out.push(Statement::gate(catalog::rz(qubit, alpha)));
        }
        out.push(Statement::gate(catalog::x90(qubit)));
        if beta.abs() > self.epsilon {
            out.push(Statement::gate(catalog::rz(qubit, beta)));
        }
        out.push(Statement::gate(catalog::x90(qubit)));
        if gamma.abs() > self.epsilon {
            out.push(Statement::gate(catalog::rz(qubit, gamma)));
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_algebra::equal_up_to_global_phase;
    use osq_ir::{semantics, QubitIndex};

    #[test]
    fn hadamard_round_trips_through_mckay() {
        let h = catalog::h(QubitIndex(0));
        let decomposer = McKayDecomposer::new();
        let replacement = decomposer.decompose(&h, 0).unwrap().unwrap();
        assert_eq!(replacement.len(), 5);

        let original = semantics::gate_unitary(&h, 1);
        let recomposed = semantics::circuit_unitary(&replacement, 1);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn x_gate_round_trips_through_mckay() {
        let x = catalog::x(QubitIndex(0));
        let decomposer = McKayDecomposer::new();
        let replacement = decomposer.decompose(&x, 0).unwrap().unwrap();

        let original = semantics::gate_unitary(&x, 1);
        let recomposed = semantics::circuit_unitary(&replacement, 1);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn controlled_gates_pass_through_untouched() {
        let cnot = catalog::cnot(QubitIndex(0), QubitIndex(1));
        let decomposer = McKayDecomposer::new();
        assert!(decomposer.decompose(&cnot, 0).unwrap().is_none());
    }
}
