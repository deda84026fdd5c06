//! The named gate catalog. Replaces the source's decorator-registered gate classes
//! with a static table: factories construct a [`Gate`] with its catalog
//! name already attached; [`recognize`] maps a bare semantic body back to a
//! name when one matches within tolerance. Builder methods on the circuit
//! façade (`Circuit::h`, `Circuit::cnot`, …) are thin wrappers over these
//! factories.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use osq_algebra::{Axis, BlochRotation, Matrix2};
use num_complex::Complex64;

use crate::error::IrResult;
use crate::gate::Gate;
use crate::qubit::QubitIndex;

/// Default tolerance for catalog matching (ε).
pub const EPSILON: f64 = 1e-8;

fn rot(qubit: QubitIndex, axis: Axis, angle: f64, phase: f64, name: &str) -> Gate {
    let rotation = BlochRotation::from_axis(axis, angle, phase)
        .expect("catalog rotations use well-formed axes");
    Gate::rotation(qubit, rotation, Some(name.to_string()))
}

pub fn identity(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, 0.0, 0.0, "I")
}

pub fn x(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::X, PI, FRAC_PI_2, "X")
}

pub fn y(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Y, PI, FRAC_PI_2, "Y")
}

pub fn z(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, PI, FRAC_PI_2, "Z")
}

/// Hadamard: rotation by π about `(1, 0, 1)/√2`.
pub fn h(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::new(1.0, 0.0, 1.0).unwrap(), PI, FRAC_PI_2, "H")
}

pub fn s(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, FRAC_PI_2, FRAC_PI_4, "S")
}

pub fn sdg(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, -FRAC_PI_2, -FRAC_PI_4, "Sdg")
}

pub fn t(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, PI / 4.0, PI / 8.0, "T")
}

pub fn tdg(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Z, -PI / 4.0, -PI / 8.0, "Tdg")
}

/// X90 (`√X`): rotation by π/2 about the x-axis.
pub fn x90(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::X, FRAC_PI_2, FRAC_PI_4, "X90")
}

/// mX90: rotation by −π/2 about the x-axis.
pub fn mx90(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::X, -FRAC_PI_2, -FRAC_PI_4, "mX90")
}

pub fn y90(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Y, FRAC_PI_2, FRAC_PI_4, "Y90")
}

pub fn my90(qubit: QubitIndex) -> Gate {
    rot(qubit, Axis::Y, -FRAC_PI_2, -FRAC_PI_4, "mY90")
}

pub fn rx(qubit: QubitIndex, theta: f64) -> Gate {
    rot(qubit, Axis::X, theta, 0.0, "Rx")
}

pub fn ry(qubit: QubitIndex, theta: f64) -> Gate {
    rot(qubit, Axis::Y, theta, 0.0, "Ry")
}

pub fn rz(qubit: QubitIndex, theta: f64) -> Gate {
    rot(qubit, Axis::Z, theta, 0.0, "Rz")
}

/// `PRX(θ, φ)`: the IQM/neutral-atom "phased X" native gate, a rotation by
/// `θ` about the axis `(cos φ, sin φ, 0)`.
pub fn prx(qubit: QubitIndex, theta: f64, phi: f64) -> Gate {
    let axis = Axis::new(phi.cos(), phi.sin(), 0.0).unwrap_or(Axis::X);
    rot(qubit, axis, theta, 0.0, "PRX")
}

/// An anonymous (or, if it matches a catalog entry, named) rotation about an
/// arbitrary axis — the writer's `Rn(nx, ny, nz, angle, phase)` instruction.
pub fn rn(qubit: QubitIndex, axis: Axis, angle: f64, phase: f64) -> IrResult<Gate> {
    let rotation = BlochRotation::from_axis(axis, angle, phase)?;
    let name = recognize_rotation(&rotation, EPSILON);
    Ok(Gate::rotation(qubit, rotation, name))
}

pub fn cnot(control: QubitIndex, target: QubitIndex) -> Gate {
    Gate::controlled(control, x(target), Some("CNOT".into()))
        .expect("control and target are always distinct operands")
}

pub fn cz(control: QubitIndex, target: QubitIndex) -> Gate {
    Gate::controlled(control, z(target), Some("CZ".into()))
        .expect("control and target are always distinct operands")
}

/// `CR(θ)`: controlled phase rotation by `θ`.
pub fn cr(control: QubitIndex, target: QubitIndex, theta: f64) -> Gate {
    Gate::controlled(control, rz(target, theta), Some("CR".into()))
        .expect("control and target are always distinct operands")
}

/// `CRk(k)`: controlled phase rotation by `2π / 2^k`, as used in QFT circuits.
pub fn crk(control: QubitIndex, target: QubitIndex, k: u32) -> Gate {
    let theta = 2.0 * PI / f64::from(1u32 << k);
    Gate::controlled(control, rz(target, theta), Some("CRk".into()))
        .expect("control and target are always distinct operands")
}

/// `SWAP`: not expressible as a `ControlledGate`; represented as a named
/// `MatrixGate`.
pub fn swap(q0: QubitIndex, q1: QubitIndex) -> Gate {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    #[rustfmt::skip]
    let data = vec![
        one,  zero, zero, zero,
        zero, zero, one,  zero,
        zero, one,  zero, zero,
        zero, zero, zero, one,
    ];
    Gate::matrix(Matrix2::new(4, data), vec![q0, q1], Some("SWAP".into()))
        .expect("SWAP matrix is unitary by construction")
}

/// Table of `(name, recognizer)` pairs used by [`recognize_rotation`] and by
/// the primitive-gate validator's notion of "known" names.
pub fn known_rotation_names() -> &'static [&'static str] {
    &[
        "I", "X", "Y", "Z", "H", "S", "Sdg", "T", "Tdg", "X90", "mX90", "Y90", "mY90", "Rx", "Ry",
        "Rz", "PRX",
    ]
}

/// Matches a bare rotation against the catalog within `eps`, ignoring
/// parameterized families (Rx/Ry/Rz/PRX are never auto-recognized back from
/// a bare matrix — only fixed-angle entries are, since "Rx" alone does not
/// pin an angle). Used by the merger to re-name a fused rotation.
pub fn recognize_rotation(rotation: &BlochRotation, eps: f64) -> Option<String> {
    let fixed_angle_entries: &[(&str, Axis, f64, f64)] = &[
        ("I", Axis::Z, 0.0, 0.0),
        ("X", Axis::X, PI, FRAC_PI_2),
        ("Y", Axis::Y, PI, FRAC_PI_2),
        ("Z", Axis::Z, PI, FRAC_PI_2),
        ("H", Axis::new(1.0, 0.0, 1.0).unwrap(), PI, FRAC_PI_2),
        ("S", Axis::Z, FRAC_PI_2, FRAC_PI_4),
        ("Sdg", Axis::Z, -FRAC_PI_2, -FRAC_PI_4),
        ("T", Axis::Z, PI / 4.0, PI / 8.0),
        ("Tdg", Axis::Z, -PI / 4.0, -PI / 8.0),
        ("X90", Axis::X, FRAC_PI_2, FRAC_PI_4),
        ("mX90", Axis::X, -FRAC_PI_2, -FRAC_PI_4),
        ("Y90", Axis::Y, FRAC_PI_2, FRAC_PI_4),
        ("mY90", Axis::Y, -FRAC_PI_2, -FRAC_PI_4),
    ];

    if rotation.is_identity(eps) {
        return Some("I".to_string());
    }

    for (name, axis, angle, phase) in fixed_angle_entries {
        if axes_close(&rotation.axis, axis, eps)
            && (rotation.angle - angle).abs() <= eps
            && phase_close(rotation.phase, *phase, eps)
        {
            return Some((*name).to_string());
        }
    }
    None
}

fn axes_close(a: &Axis, b: &Axis, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps && (a.z - b.z).abs() <= eps
}

/// Phase comparison modulo 2π (global phase is only meaningful mod 2π).
fn phase_close(a: f64, b: f64, eps: f64) -> bool {
    let diff = (a - b).rem_euclid(2.0 * PI);
    diff <= eps || (2.0 * PI - diff) <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h_round_trips_through_recognizer() {
        let gate = h(QubitIndex(0));
        let rotation = gate.as_rotation().unwrap().rotation;
        assert_eq!(recognize_rotation(&rotation, EPSILON).as_deref(), Some("H"));
    }

    #[test]
    fn identity_is_recognized_regardless_of_axis() {
        let rotation = BlochRotation::identity();
        assert_eq!(recognize_rotation(&rotation, EPSILON).as_deref(), Some("I"));
    }

    #[test]
    fn cnot_has_cnot_name_and_two_operands() {
        let gate = cnot(QubitIndex(0), QubitIndex(1));
        assert_eq!(gate.name.as_deref(), Some("CNOT"));
        assert_eq!(gate.operands(), vec![QubitIndex(0), QubitIndex(1)]);
    }

    #[test]
    fn swap_matrix_is_self_inverse() {
        let g = swap(QubitIndex(0), QubitIndex(1));
        let m = g.to_matrix();
        let squared = m.mul(&m);
        let id = Matrix2::identity(4);
        assert!(osq_algebra::equal_up_to_global_phase(&squared, &id, 1e-9));
    }
}
