//! Two-qubit controlled-rotation decomposition via ABC factorization
//! (Barenco et al.): any `ControlledGate` whose target is a single-qubit
//! rotation can be written as three target-qubit rotations sandwiching two
//! entangling gates, plus a phase correction on the control.

use std::f64::consts::FRAC_PI_2;

use osq_algebra::{Axis, BlochRotation};
use osq_ir::{catalog, Decomposer, Gate, IrResult, QubitIndex, Statement};

/// Which two-qubit primitive sandwiches the target-qubit rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entangling {
    Cnot,
    Cz,
}

/// ABC-factorizes a controlled single-qubit rotation around `CNOT` or `CZ`.
///
/// For `U = e^{iα}·Rz(θ2)·Ry(θ1)·Rz(θ0)` the factors are
/// `A = Rz(θ2)·Ry(θ1/2)`, `B = Ry(−θ1/2)·Rz(−(θ0+θ2)/2)`,
/// `C = Rz((θ0−θ2)/2)`, satisfying `ABC = I` and
/// `A·X·B·X·C = U` up to the control-qubit phase `Rz(α)`. The `Cz` variant
/// absorbs the CNOT→CZ basis change (`Ry(∓π/2)` on the target) directly
/// into `A`, `B`, and `C`.
pub struct ControlledDecomposer {
    pub entangling: Entangling,
    pub epsilon: f64,
}

impl ControlledDecomposer {
    pub fn new(entangling: Entangling) -> Self {
        ControlledDecomposer { entangling, epsilon: catalog::EPSILON }
    }
}

impl Decomposer for ControlledDecomposer {
    fn name(&self) -> &'static str {
        match self.entangling {
            Entangling::Cnot => "CNOTDecomposer",
            Entangling::Cz => "CZDecomposer",
        }
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some(controlled) = gate.as_controlled() else {
            return Ok(None);
        };
        let Some(target) = controlled.target_gate.as_rotation() else {
            return Ok(None);
        };

        let control = controlled.control;
        let target_qubit = target.qubit;
        let angles = target.rotation.decompose_to_axes(Axis::Z, Axis::Y);
        let alpha = target.rotation.phase;

        // θ0, θ1, θ2 in the caller's ABC notation map to our θ3, θ2, θ1.
        let theta0 = angles.theta3;
        let theta1 = angles.theta2;
        let theta2 = angles.theta1;

        let rz = |theta: f64| BlochRotation::from_axis(Axis::Z, theta, 0.0).unwrap();
        let ry = |theta: f64| BlochRotation::from_axis(Axis::Y, theta, 0.0).unwrap();

        let a = ry(theta1 / 2.0).compose(&rz(theta2)).unwrap();
        let b = rz(-(theta0 + theta2) / 2.0).compose(&ry(-theta1 / 2.0)).unwrap();
        let c = rz((theta0 - theta2) / 2.0);

        let (a, b, c) = match self.entangling {
            Entangling::Cnot => (a, b, c),
            Entangling::Cz => {
                let basis_in = ry(FRAC_PI_2);
                let basis_out = ry(-FRAC_PI_2);
                let a = a.compose(&basis_in).unwrap();
                let b = basis_out.compose(&b).unwrap().compose(&basis_in).unwrap();
                let c = basis_out.compose(&c).unwrap();
                (a, b, c)
            }
        };

        let entangling_gate = |control: QubitIndex, target: QubitIndex| match self.entangling {
            Entangling::Cnot => catalog::cnot(control, target),
            Entangling::Cz => catalog::cz(control, target),
        };

        let mut out = Vec::with_capacity(6);
        push_rotation(&mut out, control, rz(alpha), self.epsilon);
        push_rotation(&mut out, target_qubit, a, self.epsilon);
        out.push(Statement::gate(entangling_gate(control, target_qubit)));
        push_rotation(&mut out, target_qubit, b, self.epsilon);
        out.push(Statement::gate(entangling_gate(control, target_qubit)));
        push_rotation(&mut out, target_qubit, c, self.epsilon);

        Ok(Some(out))
    }
}

fn push_rotation(out: &mut Vec<Statement>, qubit: QubitIndex, rotation: BlochRotation, epsilon: f64) {
    if rotation.is_identity(epsilon) {
        return;
    }
    let name = catalog::recognize_rotation(&rotation, epsilon);
    out.push(Statement::gate(Gate::rotation(qubit, rotation, name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_algebra::equal_up_to_global_phase;
    use osq_ir::semantics;

    fn crz(control: QubitIndex, target: QubitIndex, theta: f64) -> Gate {
        let rz = catalog::rz(target, theta);
        Gate::controlled(control, rz, None).unwrap()
    }

    #[test]
    fn cnot_decomposer_preserves_unitary_for_controlled_rz() {
        let gate = crz(QubitIndex(0), QubitIndex(1), 0.7);
        let decomposer = ControlledDecomposer::new(Entangling::Cnot);
        let replacement = decomposer.decompose(&gate, 0).unwrap().unwrap();

        let original = semantics::gate_unitary(&gate, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-7));
    }

    #[test]
    fn cz_decomposer_preserves_unitary_for_controlled_h() {
        let h = catalog::h(QubitIndex(1));
        let gate = Gate::controlled(QubitIndex(0), h, None).unwrap();
        let decomposer = ControlledDecomposer::new(Entangling::Cz);
        let replacement = decomposer.decompose(&gate, 0).unwrap().unwrap();

        let original = semantics::gate_unitary(&gate, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-7));
    }

    #[test]
    fn cnot_matches_the_catalog_cnot_gate() {
        let gate = catalog::cnot(QubitIndex(0), QubitIndex(1));
        let decomposer = ControlledDecomposer::new(Entangling::Cnot);
        let replacement = decomposer.decompose(&gate, 0).unwrap().unwrap();

        let original = semantics::gate_unitary(&gate, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-7));
    }

    #[test]
    fn non_controlled_gates_pass_through_untouched() {
        let x = catalog::x(QubitIndex(0));
        let decomposer = ControlledDecomposer::new(Entangling::Cnot);
        assert!(decomposer.decompose(&x, 0).unwrap().is_none());
    }
}
