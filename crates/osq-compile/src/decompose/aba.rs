//! ABA-family single-qubit decomposers: `r = Ra(θ1)·Rb(θ2)·Ra(θ3)` for an
//! orthogonal axis pair `(a, b)`, derived from [`BlochRotation::decompose_to_axes`].

use osq_algebra::Axis;
use osq_ir::{catalog, Decomposer, Gate, IrResult, QubitIndex, Statement};

/// One of the six orthogonal axis-pair orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbaAxes {
    Xyx,
    Xzx,
    Yxy,
    Yzy,
    Zxz,
    Zyz,
}

impl AbaAxes {
    fn axes(self) -> (Axis, Axis) {
        match self {
            AbaAxes::Xyx => (Axis::X, Axis::Y),
            AbaAxes::Xzx => (Axis::X, Axis::Z),
            AbaAxes::Yxy => (Axis::Y, Axis::X),
            AbaAxes::Yzy => (Axis::Y, Axis::Z),
            AbaAxes::Zxz => (Axis::Z, Axis::X),
            AbaAxes::Zyz => (Axis::Z, Axis::Y),
        }
    }

    fn outer(self, qubit: QubitIndex, theta: f64) -> Gate {
        match self {
            AbaAxes::Xyx | AbaAxes::Xzx => catalog::rx(qubit, theta),
            AbaAxes::Yxy | AbaAxes::Yzy => catalog::ry(qubit, theta),
            AbaAxes::Zxz | AbaAxes::Zyz => catalog::rz(qubit, theta),
        }
    }

    fn inner(self, qubit: QubitIndex, theta: f64) -> Gate {
        match self {
            AbaAxes::Yxy | AbaAxes::Zxz => catalog::rx(qubit, theta),
            AbaAxes::Xyx | AbaAxes::Zyz => catalog::ry(qubit, theta),
            AbaAxes::Xzx | AbaAxes::Yzy => catalog::rz(qubit, theta),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbaAxes::Xyx => "XYXDecomposer",
            AbaAxes::Xzx => "XZXDecomposer",
            AbaAxes::Yxy => "YXYDecomposer",
            AbaAxes::Yzy => "YZYDecomposer",
            AbaAxes::Zxz => "ZXZDecomposer",
            AbaAxes::Zyz => "ZYZDecomposer",
        }
    }
}

/// Rewrites a single-qubit rotation into at most three gates along the
/// chosen axis triple, omitting any that canonicalize to the identity.
/// Leaves controlled and matrix gates untouched.
pub struct AbaDecomposer {
    pub axes: AbaAxes,
    pub epsilon: f64,
}

impl AbaDecomposer {
    pub fn new(axes: AbaAxes) -> Self {
        AbaDecomposer { axes, epsilon: catalog::EPSILON }
    }
}

impl Decomposer for AbaDecomposer {
    fn name(&self) -> &'static str {
        self.axes.name()
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some(rotation) = gate.as_rotation() else {
            return Ok(None);
        };
        let qubit = rotation.qubit;
        let (a, b) = self.axes.axes();
        let angles = rotation.rotation.decompose_to_axes(a, b);

        // Time order: θ3 first, θ2 in the middle, θ1 last (matrix notation
        // applies Ra(θ1) last, rightmost operator first).
        let mut out = Vec::with_capacity(3);
        if angles.theta3.abs() > self.epsilon {
            out.push(Statement::gate(self.axes.outer(qubit, angles.theta3)));
        }
        if angles.theta2.abs() > self.epsilon {
            out.push(Statement::gate(self.axes.inner(qubit, angles.theta2)));
        }
        if angles.theta1.abs() > self.epsilon {
            out.push(Statement::gate(self.axes.outer(qubit, angles.theta1)));
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_algebra::{equal_up_to_global_phase, BlochRotation};
    use osq_ir::semantics;
    use std::f64::consts::PI;

    #[test]
    fn zyz_decomposes_hadamard_into_three_gates() {
        let h = catalog::h(QubitIndex(0));
        let decomposer = AbaDecomposer::new(AbaAxes::Zyz);
        let replacement = decomposer.decompose(&h, 0).unwrap().unwrap();
        assert_eq!(replacement.len(), 3);

        let original = semantics::gate_unitary(&h, 1);
        let recomposed = semantics::circuit_unitary(&replacement, 1);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn pure_rz_input_collapses_to_single_gate() {
        let rotation = BlochRotation::from_axis(Axis::Z, PI / 3.0, 0.0).unwrap();
        let gate = Gate::rotation(QubitIndex(0), rotation, None);
        let decomposer = AbaDecomposer::new(AbaAxes::Zyz);
        let replacement = decomposer.decompose(&gate, 0).unwrap().unwrap();
        assert_eq!(replacement.len(), 1);
    }

    #[test]
    fn controlled_gates_pass_through_untouched() {
        let cnot = catalog::cnot(QubitIndex(0), QubitIndex(1));
        let decomposer = AbaDecomposer::new(AbaAxes::Zyz);
        assert!(decomposer.decompose(&cnot, 0).unwrap().is_none());
    }
}
